//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post, put},
    Router,
};
use std::{sync::Arc, time::Duration};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
};

use crate::{
    auth::{authenticate, require_role},
    config::ServerConfig,
    handlers,
    middleware::AppState,
    models::user::UserRole,
};

/// 请求体上限
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/products", get(handlers::product::list_products))
        .route("/api/products/{id}", get(handlers::product::get_product))
        .route(
            "/api/products/category/{category}",
            get(handlers::product::list_by_category),
        )
        .route(
            "/api/feedback",
            get(handlers::feedback::list_feedback).post(handlers::feedback::submit_feedback),
        );

    // 需要认证的路由
    let authenticated_routes = Router::new()
        .route("/api/auth/me", get(handlers::auth::get_current_user))
        .route("/api/orders", post(handlers::order::place_order))
        .route(
            "/api/orders/user/{user_id}",
            get(handlers::order::list_user_orders),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state.token_codec.clone(),
            authenticate,
        ));

    // 管理员路由：先认证，再检查角色；只作用于已匹配的路由
    let admin_routes = Router::new()
        .route("/api/dashboard", get(handlers::admin::dashboard))
        .route("/api/reports/sales", get(handlers::admin::sales_report))
        .route("/api/products", post(handlers::product::create_product))
        .route(
            "/api/products/{id}",
            put(handlers::product::update_product).delete(handlers::product::delete_product),
        )
        .route(
            "/api/products/{id}/supply",
            post(handlers::product::supply_product),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            UserRole::Admin,
            require_role,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            state.token_codec.clone(),
            authenticate,
        ));

    let server_config = &state.config.server;

    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(timeout_layer(server_config))
        .layer(cors_layer(server_config))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_tracking_middleware,
        ))
        .with_state(state)
}

/// 请求超时，超时返回 408
fn timeout_layer(config: &ServerConfig) -> TimeoutLayer {
    TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        Duration::from_secs(config.request_timeout_secs),
    )
}

/// 跨域配置：未配置来源时允许任意来源
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .max_age(Duration::from_secs(60 * 60))
}
