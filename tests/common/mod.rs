//! 测试公共模块
//! 每个测试使用独立的内存 SQLite 数据库

#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use restaurant_api::{
    config::{AppConfig, DatabaseConfig, LoggingConfig, SecurityConfig, ServerConfig},
    db,
    middleware::AppState,
    routes,
};
use secrecy::Secret;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置
pub fn create_test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
            request_timeout_secs: 10,
            cors_allowed_origins: vec![],
        },
        database: DatabaseConfig {
            // 内存库只存在于单个连接中
            url: Secret::new("sqlite::memory:".to_string()),
            max_connections: 1,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
        },
    }
}

/// 初始化测试数据库
pub async fn setup_test_db(config: &AppConfig) -> SqlitePool {
    let pool = db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool");

    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// 创建测试应用状态
pub fn create_test_app_state(pool: SqlitePool) -> Arc<AppState> {
    Arc::new(AppState::new(create_test_config(), pool).expect("Failed to build app state"))
}

/// 路由 + 数据库
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = create_test_config();
        let pool = setup_test_db(&config).await;
        let state = create_test_app_state(pool.clone());
        let router = routes::create_router(state.clone());

        Self {
            router,
            state,
            pool,
        }
    }

    /// 发送请求，返回状态码与 JSON 响应体（空响应体为 Null）
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request("GET", uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, token, Some(body)).await
    }

    /// 注册并返回 (token, user)
    pub async fn register(&self, email: &str, password: &str, name: &str) -> (String, Value) {
        let (status, body) = self
            .post(
                "/api/auth/register",
                None,
                json!({ "email": email, "password": password, "name": name }),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        let token = body["token"].as_str().unwrap().to_string();
        (token, body["user"].clone())
    }

    /// 第一个注册的用户是管理员
    pub async fn admin_token(&self) -> String {
        self.register("admin@example.com", "admin-pw", "Admin").await.0
    }

    pub async fn customer_token(&self, email: &str) -> String {
        self.register(email, "customer-pw", "Customer").await.0
    }

    /// 直接写入一个商品
    pub async fn seed_product(&self, name: &str, price: f64, stock: i64) -> i64 {
        sqlx::query_scalar(
            r#"
            INSERT INTO products (name, price, description, category, stock_quantity, low_stock_threshold)
            VALUES (?, ?, 'Test dish', 'eastern', ?, 5)
            RETURNING id
            "#,
        )
        .bind(name)
        .bind(price)
        .bind(stock)
        .fetch_one(&self.pool)
        .await
        .expect("Failed to seed product")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }
}
