//! 顾客反馈的 HTTP 处理器

use crate::{
    error::AppError, handlers::ApiJson, middleware::AppState,
    models::feedback::FeedbackRequest, repository::FeedbackRepository,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

/// 提交反馈
pub async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<FeedbackRequest>,
) -> Result<impl IntoResponse, AppError> {
    req.validate()?;

    let repo = FeedbackRepository::new(state.db.clone());
    let feedback = repo.create(&req).await?;

    tracing::info!(feedback_id = feedback.id, rating = feedback.rating, "Feedback received");

    Ok((StatusCode::CREATED, Json(feedback)))
}

/// 列出反馈
pub async fn list_feedback(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let repo = FeedbackRepository::new(state.db.clone());
    let feedback = repo.list().await?;

    Ok(Json(feedback))
}
