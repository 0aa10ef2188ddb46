//! 订单的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext, error::AppError, handlers::ApiJson, middleware::AppState,
    models::order::PlaceOrderRequest,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

/// 下单
pub async fn place_order(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    ApiJson(req): ApiJson<PlaceOrderRequest>,
) -> Result<impl IntoResponse, AppError> {
    let order = state.order_service.place(&auth_context, req).await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// 查询用户订单
pub async fn list_user_orders(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let orders = state
        .order_service
        .list_for_user(&auth_context, user_id)
        .await?;

    Ok(Json(orders))
}
