//! Session token issuance and validation
//!
//! Tokens are HS256 JWTs carrying [`SessionClaims`]. Validation is fully
//! offline: signature, algorithm and expiry are checked against the secret the
//! codec was built with, and no store is consulted.

use crate::{
    config::{SecurityConfig, MIN_JWT_SECRET_LEN},
    error::AppError,
    models::user::{User, UserRole},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, decode_header, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header,
    Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Session lifetime: exactly four hours from issuance
pub const SESSION_TTL_SECS: i64 = 4 * 60 * 60;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Identity handle
    #[serde(rename = "userId")]
    pub user_id: i64,

    pub email: String,

    pub role: UserRole,

    /// Issued at (epoch seconds)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration (epoch seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl SessionClaims {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

/// Why a token was rejected. Callers only ever see 401; the variants exist
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token is malformed")]
    Malformed,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token uses an unexpected signing algorithm")]
    WrongAlgorithm,

    #[error("token has expired")]
    Expired,

    #[error("failed to encode token: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::WrongAlgorithm
            }
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Session token codec
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create codec from config
    pub fn from_config(config: &SecurityConfig) -> Result<Self, AppError> {
        let secret = config.jwt_secret.expose_secret();

        // Ensure secret is at least 32 bytes for HS256
        if secret.len() < MIN_JWT_SECRET_LEN {
            return Err(AppError::Config(format!(
                "JWT secret too short (min {} chars)",
                MIN_JWT_SECRET_LEN
            )));
        }

        Ok(Self::with_secret(secret.as_bytes()))
    }

    fn with_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        // Expiry is checked against an explicit clock in `validate_at`
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for an identity
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as of `now`
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, TokenError> {
        let issued_at = now.timestamp();

        let claims = SessionClaims {
            user_id: user.id,
            email: user.email.clone(),
            role: user.role,
            issued_at,
            expires_at: issued_at + SESSION_TTL_SECS,
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to encode session token: {:?}", e);
            TokenError::Encoding(e.to_string())
        })
    }

    /// Validate and decode a token
    pub fn validate(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate and decode a token as of `now`
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        let header = decode_header(token).map_err(|e| {
            // `alg: none` and friends do not even parse as a header
            match header_algorithm(token) {
                Some(alg) if alg != "HS256" => TokenError::WrongAlgorithm,
                _ => TokenError::from(e),
            }
        })?;

        if header.alg != SIGNING_ALGORITHM {
            return Err(TokenError::WrongAlgorithm);
        }

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?.claims;

        if now.timestamp() >= claims.expires_at {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

/// Read the raw `alg` field of a token header without trusting its shape
fn header_algorithm(token: &str) -> Option<String> {
    let encoded = token.split('.').next()?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    let header: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    header.get("alg")?.as_str().map(str::to_owned)
}
