//! 认证服务：注册、登录、当前用户

use crate::{
    auth::{jwt::TokenCodec, middleware::AuthContext, password::PasswordHasher},
    error::AppError,
    models::user::{
        normalize_email, AuthResponse, LoginRequest, NewUser, RegisterRequest, User, UserResponse,
    },
    repository::user_repo::UserRepository,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct AuthService {
    db: SqlitePool,
    token_codec: Arc<TokenCodec>,
    hasher: Arc<PasswordHasher>,
    // 未知邮箱登录时用于校验的占位摘要，参数与真实摘要一致
    dummy_digest: String,
}

impl AuthService {
    pub fn new(db: SqlitePool, token_codec: Arc<TokenCodec>) -> Result<Self, AppError> {
        let hasher = PasswordHasher::new();
        let dummy_digest = hasher.hash(&Uuid::new_v4().to_string())?;

        Ok(Self {
            db,
            token_codec,
            hasher: Arc::new(hasher),
            dummy_digest,
        })
    }

    /// 注册：第一个注册的用户成为 admin，之后均为 customer
    pub async fn register(&self, mut req: RegisterRequest) -> Result<AuthResponse, AppError> {
        req.email = normalize_email(&req.email);
        req.validate()?;

        let password_hash = self.hash_password(req.password).await?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo
            .create(&NewUser {
                email: &req.email,
                password_hash: &password_hash,
                name: &req.name,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, "User registered");

        let token = self.token_codec.issue(&user)?;

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    /// 登录：未知邮箱与密码错误返回同一个错误
    pub async fn login(&self, mut req: LoginRequest) -> Result<AuthResponse, AppError> {
        req.email = normalize_email(&req.email);
        req.validate()?;

        let user_repo = UserRepository::new(self.db.clone());
        let user = user_repo.find_by_email(&req.email).await?;

        // 未知邮箱同样执行一次完整校验，两种失败耗时一致
        let digest = self.login_digest(user.as_ref()).to_string();
        let matches = self.verify_password(req.password, digest).await?;

        let user = match user {
            Some(user) if matches => user,
            Some(user) => {
                warn!(user_id = user.id, "Login failed: password mismatch");
                return Err(AppError::InvalidCredentials);
            }
            None => {
                warn!("Login failed: unknown account");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.token_codec.issue(&user)?;

        info!(user_id = user.id, "User logged in");

        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }

    /// 当前登录用户
    pub async fn current_user(&self, ctx: &AuthContext) -> Result<UserResponse, AppError> {
        let user_repo = UserRepository::new(self.db.clone());

        // 令牌仍有效但用户记录已不存在时按未认证处理
        let user = user_repo
            .find_by_id(ctx.user_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(UserResponse::from(user))
    }

    fn login_digest<'a>(&'a self, user: Option<&'a User>) -> &'a str {
        user.map_or(self.dummy_digest.as_str(), |user| user.password_hash.as_str())
    }

    // Argon2 在阻塞线程池中计算
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::internal(format!("Password hashing task failed: {}", e)))??;

        Ok(digest)
    }

    async fn verify_password(&self, password: String, digest: String) -> Result<bool, AppError> {
        let hasher = Arc::clone(&self.hasher);
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::internal(format!("Password verification task failed: {}", e)))??;

        Ok(matches)
    }
}
