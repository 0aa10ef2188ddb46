//! 管理端报表的 HTTP 处理器

use crate::{error::AppError, middleware::AppState};
use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

/// 仪表盘
pub async fn dashboard(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, AppError> {
    let stats = state.report_service.dashboard().await?;

    Ok(Json(stats))
}

/// 销售报表
pub async fn sales_report(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let report = state.report_service.sales_report().await?;

    Ok(Json(report))
}
