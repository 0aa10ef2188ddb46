//! Password hashing and verification using Argon2id
//!
//! Digests are PHC strings (`$argon2id$v=19$m=..,t=..,p=..$salt$hash`), so the
//! parameters and salt travel with the hash and verification needs nothing else.

use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PhcError, PasswordHash, PasswordHasher as _, PasswordVerifier,
        SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

/// Memory cost in KiB (64 MiB)
const MEMORY_COST_KIB: u32 = 65536;
/// Iterations
const TIME_COST: u32 = 3;
/// Lanes
const PARALLELISM: u32 = 4;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hashing(String),

    /// The stored digest could not be parsed or uses unsupported parameters.
    #[error("stored password digest is malformed: {0}")]
    MalformedDigest(String),
}

/// Password hasher with fixed work-factor parameters
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create hasher with OWASP recommended parameters (m=64MiB, t=3, p=4)
    pub fn new() -> Self {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .expect("static Argon2 parameters are within range");

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        Self { argon2 }
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                PasswordError::Hashing(e.to_string())
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored digest.
    ///
    /// Returns `Ok(false)` only when the password does not match. A digest that
    /// cannot be read is an error so callers never mistake corrupted storage for
    /// a wrong password.
    pub fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(digest).map_err(|e| {
            tracing::error!("Failed to parse stored password digest: {}", e);
            PasswordError::MalformedDigest(e.to_string())
        })?;

        // Parameters come from the digest, comparison is constant time
        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PhcError::Password) => Ok(false),
            Err(e) => {
                tracing::error!("Stored password digest rejected: {}", e);
                Err(PasswordError::MalformedDigest(e.to_string()))
            }
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
