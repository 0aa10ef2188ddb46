//! 认证 API 集成测试

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::json;
use std::time::{Duration, Instant};
use tower::ServiceExt;

mod common;
use common::TestApp;

#[tokio::test]
async fn test_first_registration_is_admin() {
    let app = TestApp::new().await;

    let (_, first) = app.register("a@x.com", "pw1", "First").await;
    let (_, second) = app.register("b@x.com", "pw2", "Second").await;

    assert_eq!(first["role"], "admin");
    assert_eq!(second["role"], "customer");
}

#[tokio::test]
async fn test_register_response_never_contains_hash() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "a@x.com", "password": "pw1", "name": "Ann" }),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["email"], "a@x.com");

    let rendered = body.to_string();
    assert!(!rendered.contains("argon2"));
    assert!(!rendered.contains("password"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::new().await;
    app.register("a@x.com", "pw1", "Ann").await;

    let (status, _) = app
        .post(
            "/api/auth/register",
            None,
            json!({ "email": "a@x.com", "password": "other", "name": "Imposter" }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_register_missing_fields() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post("/api/auth/register", None, json!({ "email": "a@x.com", "password": "" , "name": "Ann" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post("/api/auth/register", None, json!({ "email": "a@x.com" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_register_email_rules() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post("/api/auth/register", None, json!({ "email": "ann", "password": "pw1", "name": "Ann" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, user) = app.register("Ann@X.com", "pw1", "Ann").await;
    assert_eq!(user["email"], "ann@x.com");

    let (status, _) = app
        .post("/api/auth/register", None, json!({ "email": "ann@x.com", "password": "pw2", "name": "Other" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.count("users").await, 1);
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new().await;
    app.register("a@x.com", "pw1", "Ann").await;

    let (status, body) = app
        .post("/api/auth/login", None, json!({ "email": "a@x.com", "password": "pw1" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].is_string());
    assert_eq!(body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new().await;
    app.register("a@x.com", "pw1", "Ann").await;

    let (wrong_status, wrong_body) = app
        .post("/api/auth/login", None, json!({ "email": "a@x.com", "password": "pw2" }))
        .await;
    let (unknown_status, unknown_body) = app
        .post("/api/auth/login", None, json!({ "email": "nobody@x.com", "password": "pw1" }))
        .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["error"]["message"], "Invalid credentials");
    assert_eq!(
        wrong_body["error"]["message"],
        unknown_body["error"]["message"]
    );
}

#[tokio::test]
async fn test_login_failure_timing_does_not_reveal_account() {
    let app = TestApp::new().await;
    app.register("a@x.com", "pw1", "Ann").await;

    async fn fastest(app: &TestApp, email: &str) -> Duration {
        let mut best = Duration::MAX;
        for _ in 0..3 {
            let started = Instant::now();
            let (status, _) = app
                .post("/api/auth/login", None, json!({ "email": email, "password": "pw2" }))
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            best = best.min(started.elapsed());
        }
        best
    }

    let wrong_password = fastest(&app, "a@x.com").await;
    let unknown_email = fastest(&app, "nobody@x.com").await;

    // 两条路径都做一次 Argon2 校验，耗时应在同一量级
    assert!(
        unknown_email * 4 >= wrong_password,
        "unknown email {:?} vs wrong password {:?}",
        unknown_email,
        wrong_password
    );
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new().await;

    let (status, _) = app.get("/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.get("/api/auth/me", Some("not-a-token")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_returns_current_user() {
    let app = TestApp::new().await;
    let (token, user) = app.register("a@x.com", "pw1", "Ann").await;

    let (status, body) = app.get("/api/auth/me", Some(&token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user["id"]);
    assert_eq!(body["email"], "a@x.com");
}

#[tokio::test]
async fn test_malformed_authorization_headers() {
    let app = TestApp::new().await;
    let (token, _) = app.register("a@x.com", "pw1", "Ann").await;

    for value in [
        token.clone(),
        format!("bearer {}", token),
        format!("Basic {}", token),
        format!("Bearer {} extra", token),
        "Bearer".to_string(),
    ] {
        let response = app
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/auth/me")
                    .header(header::AUTHORIZATION, value.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "header {:?}", value);

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], 401);
    }
}
