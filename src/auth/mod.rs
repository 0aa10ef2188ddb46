//! Authentication and authorization module

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{SessionClaims, TokenCodec, TokenError, SESSION_TTL_SECS};
pub use middleware::{authenticate, extract_bearer, require_role, AuthContext, BearerError};
pub use password::{PasswordError, PasswordHasher};
