//! 用户数据访问层

use crate::{
    error::AppError,
    models::user::{NewUser, User},
};
use chrono::Utc;
use sqlx::SqlitePool;

pub struct UserRepository {
    db: SqlitePool,
}

impl UserRepository {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// 根据邮箱查找用户
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 根据 ID 查找用户
    pub async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(user)
    }

    /// 用户总数
    pub async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }

    /// 创建用户
    ///
    /// 角色在同一条语句内决定：表为空时为 admin，否则为 customer。
    /// SQLite 写操作串行执行，两个并发注册不会同时看到空表。
    pub async fn create(&self, new_user: &NewUser<'_>) -> Result<User, AppError> {
        let result = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, role, created_at)
            SELECT ?, ?, ?,
                   CASE WHEN EXISTS (SELECT 1 FROM users) THEN 'customer' ELSE 'admin' END,
                   ?
            RETURNING *
            "#,
        )
        .bind(new_user.email)
        .bind(new_user.password_hash)
        .bind(new_user.name)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await;

        match result {
            Ok(user) => Ok(user),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AppError::Conflict("Email is already registered".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
