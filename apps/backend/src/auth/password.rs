//! Argon2id password hashing.
//!
//! Hashing is CPU-bound; async callers go through [`hash_password_blocking`]
//! and [`verify_password_blocking`] so the work lands on Tokio's blocking pool.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use tracing::error;

use crate::AppError;

const HASH_FAILED: &str = "Failed to hash password";

/// Hash a password into a PHC string with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!(error = %e, "password hashing failed");
            AppError::internal(HASH_FAILED)
        })
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(password_hash).map_err(|e| {
        error!(error = %e, "stored password hash is not valid PHC");
        AppError::internal("Failed to verify password")
    })?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => {
            error!(error = %e, "password verification failed");
            Err(AppError::internal("Failed to verify password"))
        }
    }
}

pub async fn hash_password_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|_| AppError::internal(HASH_FAILED))?
}

pub async fn verify_password_blocking(
    password: String,
    password_hash: String,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &password_hash))
        .await
        .map_err(|_| AppError::internal("Failed to verify password"))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = hash_password("password1").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("password1"));

        assert!(verify_password("password1", &hash).unwrap());
        assert!(!verify_password("password2", &hash).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("password1").unwrap();
        let b = hash_password("password1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        let err = verify_password("password1", "not-a-phc-string").unwrap_err();
        assert_eq!(err.status().as_u16(), 500);
    }

    #[tokio::test]
    async fn blocking_wrappers_roundtrip() {
        let hash = hash_password_blocking("secret-pass".to_string()).await.unwrap();
        assert!(verify_password_blocking("secret-pass".to_string(), hash)
            .await
            .unwrap());
    }
}
