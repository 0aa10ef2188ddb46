//! 菜品目录的 HTTP 处理器

use crate::{
    auth::middleware::AuthContext,
    error::AppError,
    handlers::ApiJson,
    middleware::AppState,
    models::product::{ProductCategory, ProductInput, SupplyRequest},
    repository::ProductRepository,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

/// 列出全部商品
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let repo = ProductRepository::new(state.db.clone());
    let products = repo.list().await?;

    Ok(Json(products))
}

/// 获取商品详情
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = ProductRepository::new(state.db.clone());
    let product = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    Ok(Json(product))
}

/// 按分类列出商品
pub async fn list_by_category(
    State(state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let category: ProductCategory = category.parse().map_err(AppError::BadRequest)?;

    let repo = ProductRepository::new(state.db.clone());
    let products = repo.list_by_category(category).await?;

    Ok(Json(products))
}

/// 创建商品
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    ApiJson(req): ApiJson<ProductInput>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.create(&req).await?;

    tracing::info!(product_id = product.id, admin_id = auth_context.user_id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// 更新商品
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<ProductInput>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo.update(id, &req).await?.ok_or(AppError::NotFound)?;

    tracing::info!(product_id = id, admin_id = auth_context.user_id, "Product updated");

    Ok(Json(product))
}

/// 删除商品
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let repo = ProductRepository::new(state.db.clone());
    if !repo.delete(id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(product_id = id, admin_id = auth_context.user_id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 补货
pub async fn supply_product(
    State(state): State<Arc<AppState>>,
    auth_context: AuthContext,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<SupplyRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = ProductRepository::new(state.db.clone());
    let product = repo
        .add_stock(id, req.quantity)
        .await?
        .ok_or(AppError::NotFound)?;

    tracing::info!(
        product_id = id,
        quantity = req.quantity,
        stock = product.stock_quantity,
        admin_id = auth_context.user_id,
        "Product restocked"
    );

    Ok(Json(product))
}
