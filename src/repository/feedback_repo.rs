//! 顾客反馈数据访问层

use crate::{
    error::AppError,
    models::feedback::{Feedback, FeedbackRequest},
};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct FeedbackRepository {
    db: SqlitePool,
}

impl FeedbackRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create(&self, req: &FeedbackRequest) -> Result<Feedback, AppError> {
        let result = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (name, email, rating, comment, product_id, product_name, date)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id, name, email, rating, comment, product_id, product_name, date
            "#,
        )
        .bind(&req.name)
        .bind(&req.email)
        .bind(req.rating)
        .bind(&req.comment)
        .bind(req.product_id)
        .bind(&req.product_name)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(feedback) => Ok(feedback),
            Err(sqlx::Error::Database(db_err)) if db_err.is_foreign_key_violation() => {
                Err(AppError::BadRequest("Unknown product".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// 全部反馈，最新的在前
    pub async fn list(&self) -> Result<Vec<Feedback>, AppError> {
        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            SELECT id, name, email, rating, comment, product_id, product_name, date
            FROM feedback
            ORDER BY date DESC, id DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(feedback)
    }
}
