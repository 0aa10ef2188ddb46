//! Customer feedback

use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub rating: i64,
    pub comment: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    pub date: String,
}

/// Submit feedback request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,
    #[validate(length(min = 1, message = "Comment is required"))]
    pub comment: String,
    #[validate(required(message = "Product ID is required"))]
    pub product_id: Option<i64>,
    #[validate(required(message = "Product name is required"), length(min = 1, message = "Product name is required"))]
    pub product_name: Option<String>,
}
