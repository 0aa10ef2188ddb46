//! 密码哈希功能测试
//!
//! 测试 Argon2id 密码哈希和验证功能

use restaurant_api::auth::password::{PasswordError, PasswordHasher};

mod common;
use common::TestApp;

#[test]
fn test_round_trip_for_varied_passwords() {
    let hasher = PasswordHasher::new();
    let long = "x".repeat(256);

    for password in ["pw1", "correct horse battery staple", "пароль-密码-🔑", long.as_str()] {
        let digest = hasher.hash(password).expect("Hashing should succeed");
        assert!(hasher.verify(password, &digest).unwrap(), "password {:?}", password);
    }
}

#[test]
fn test_wrong_passwords_are_false() {
    let hasher = PasswordHasher::new();
    let digest = hasher.hash("pw1").unwrap();

    for wrong in ["pw2", "PW1", "pw1 ", "", "pw"] {
        assert_eq!(hasher.verify(wrong, &digest).ok(), Some(false), "password {:?}", wrong);
    }
}

#[test]
fn test_same_password_different_digests() {
    let hasher = PasswordHasher::new();

    let first = hasher.hash("pw1").unwrap();
    let second = hasher.hash("pw1").unwrap();

    assert_ne!(first, second);
    assert!(hasher.verify("pw1", &first).unwrap());
    assert!(hasher.verify("pw1", &second).unwrap());
}

#[test]
fn test_corrupt_digest_is_error_not_mismatch() {
    let hasher = PasswordHasher::new();

    let result = hasher.verify("pw1", "plaintext-password");
    assert!(matches!(result, Err(PasswordError::MalformedDigest(_))));
}

#[tokio::test]
async fn test_stored_credential_is_argon2id() {
    let app = TestApp::new().await;
    app.register("a@x.com", "pw1", "Ann").await;

    let digest: String = sqlx::query_scalar("SELECT password_hash FROM users WHERE email = ?")
        .bind("a@x.com")
        .fetch_one(&app.pool)
        .await
        .unwrap();

    assert!(digest.starts_with("$argon2id$"));
    assert!(!digest.contains("pw1"));
    assert!(PasswordHasher::new().verify("pw1", &digest).unwrap());
}
