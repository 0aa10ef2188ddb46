//! 认证与授权中间件
//!
//! 两个可组合的阶段：`authenticate` 校验 Bearer 令牌并把 [`AuthContext`]
//! 附加到请求上；`require_role` 在其后检查角色。handler 通过提取器显式
//! 接收 `AuthContext`，再把它作为参数传给下游服务。

use crate::{
    auth::jwt::{SessionClaims, TokenCodec},
    error::AppError,
    models::user::UserRole,
};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use thiserror::Error;

/// 认证上下文（已验证的身份）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i64,
    pub email: String,
    pub role: UserRole,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl From<SessionClaims> for AuthContext {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            role: claims.role,
        }
    }
}

// 实现 FromRequestParts 以便在 handler 中直接提取 AuthContext
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

/// Authorization 头解析失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BearerError {
    #[error("authorization header missing")]
    Missing,

    #[error("authorization header is not `Bearer <token>`")]
    Malformed,
}

/// 从 Authorization 头提取令牌：必须恰好是 `Bearer` 加一个令牌
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers.get(AUTHORIZATION).ok_or(BearerError::Missing)?;
    let value = value.to_str().map_err(|_| BearerError::Malformed)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(BearerError::Malformed),
    }
}

/// 认证阶段：令牌无效时直接返回 401，不进入下游
pub async fn authenticate(
    State(codec): State<Arc<TokenCodec>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = {
        let token = extract_bearer(req.headers()).map_err(|e| {
            tracing::debug!(reason = %e, "Request rejected by authentication");
            AppError::Unauthorized
        })?;

        codec.validate(token)?
    };

    // 附加到请求扩展
    req.extensions_mut().insert(AuthContext::from(claims));

    Ok(next.run(req).await)
}

/// 授权判断：没有认证上下文同样视为禁止
pub fn authorize(context: Option<&AuthContext>, required: UserRole) -> Result<(), AppError> {
    match context {
        Some(ctx) if ctx.role == required => Ok(()),
        Some(ctx) => {
            tracing::warn!(
                user_id = ctx.user_id,
                role = %ctx.role,
                required = %required,
                "Role check failed"
            );
            Err(AppError::Forbidden)
        }
        None => {
            tracing::warn!(required = %required, "Role check without authentication");
            Err(AppError::Forbidden)
        }
    }
}

/// 授权阶段：必须组合在 `authenticate` 之后
pub async fn require_role(
    State(required): State<UserRole>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    authorize(req.extensions().get::<AuthContext>(), required)?;

    Ok(next.run(req).await)
}
