//! Registration, login, refresh and token validation.
//!
//! Every function takes `now` explicitly so expiry behavior is testable.

use std::time::SystemTime;

use sea_orm::ConnectionTrait;
use tracing::{debug, info};
use validator::ValidateEmail;

use crate::auth::claims::TokenKind;
use crate::auth::jwt::{mint_token, verify_token};
use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User};
use crate::state::security_config::SecurityConfig;
use crate::AppError;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const EMAIL_EXISTS: &str = "Email already exists";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

fn validate_credentials(email: &str, password: &str) -> Result<(), AppError> {
    if !email.validate_email() {
        return Err(AppError::invalid("email not valid"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::invalid("password not valid"));
    }
    Ok(())
}

fn duplicate_email() -> AppError {
    AppError::conflict(ErrorCode::UniqueEmail, EMAIL_EXISTS)
}

/// Create a user with a freshly hashed password.
pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password: &str,
) -> Result<User, AppError> {
    validate_credentials(email, password)?;

    // Pre-check for a clean message; the unique index settles races.
    if users::email_registered(conn, email).await? {
        return Err(duplicate_email());
    }

    let password_hash = hash_password_blocking(password.to_string()).await?;

    let user = users::create_user(conn, email, &password_hash)
        .await
        .map_err(|e| match e {
            DomainError::Conflict(ConflictKind::UniqueEmail, _) => duplicate_email(),
            other => AppError::from(other),
        })?;

    info!(user_id = user.id, email = %Redacted(email), "user registered");
    Ok(user)
}

/// Exchange credentials for an access/refresh pair.
///
/// Unknown email and wrong password both yield `InvalidCredentials`.
pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    email: &str,
    password: &str,
    now: SystemTime,
) -> Result<TokenPair, AppError> {
    let Some(user) = users::find_user_by_email(conn, email).await? else {
        debug!(email = %Redacted(email), "login for unknown email");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_blocking(password.to_string(), user.password_hash.clone()).await? {
        debug!(user_id = user.id, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let pair = TokenPair {
        access_token: mint_token(TokenKind::Access, &user.email, now, security)?,
        refresh_token: mint_token(TokenKind::Refresh, &user.email, now, security)?,
    };

    info!(user_id = user.id, "user logged in");
    Ok(pair)
}

/// Mint a new access token from a refresh token. The refresh token is not rotated,
/// and the subject is not re-checked against the store here.
pub fn refresh(
    security: &SecurityConfig,
    refresh_token: &str,
    now: SystemTime,
) -> Result<String, AppError> {
    let claims = verify_token(refresh_token, now, security)
        .map_err(|e| e.into_app_error(TokenKind::Refresh))?;

    if claims.token_type != TokenKind::Refresh {
        return Err(AppError::InvalidToken(TokenKind::Refresh));
    }

    mint_token(TokenKind::Access, &claims.sub, now, security)
}

/// Resolve an access token back to its user.
pub async fn validate<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    security: &SecurityConfig,
    access_token: &str,
    now: SystemTime,
) -> Result<User, AppError> {
    let claims = verify_token(access_token, now, security)
        .map_err(|e| e.into_app_error(TokenKind::Access))?;

    if claims.token_type != TokenKind::Access {
        return Err(AppError::InvalidToken(TokenKind::Access));
    }

    users::find_user_by_email(conn, &claims.sub)
        .await?
        .ok_or(AppError::UserNotFound)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, SystemTime};

    use super::*;
    use crate::auth::jwt::issue_token;

    fn security() -> SecurityConfig {
        SecurityConfig::new(b"auth-service-test-secret".to_vec())
    }

    #[test]
    fn credential_rules() {
        assert!(validate_credentials("u@x.com", "password1").is_ok());
        assert_eq!(
            validate_credentials("not-an-email", "password1")
                .unwrap_err()
                .message(),
            "email not valid"
        );
        assert_eq!(
            validate_credentials("u@x.com", "short").unwrap_err().message(),
            "password not valid"
        );
        // exactly the minimum length
        assert!(validate_credentials("u@x.com", "12345678").is_ok());
    }

    #[test]
    fn refresh_keeps_subject() {
        let security = security();
        let now = SystemTime::now();
        let refresh_token = mint_token(TokenKind::Refresh, "u@x.com", now, &security).unwrap();

        let access = refresh(&security, &refresh_token, now).unwrap();
        let claims = verify_token(&access, now, &security).unwrap();
        assert_eq!(claims.token_type, TokenKind::Access);
        assert_eq!(claims.sub, "u@x.com");
    }

    #[test]
    fn refresh_rejects_access_tokens() {
        let security = security();
        let now = SystemTime::now();
        let access = mint_token(TokenKind::Access, "u@x.com", now, &security).unwrap();

        let err = refresh(&security, &access, now).unwrap_err();
        assert!(matches!(err, AppError::InvalidToken(TokenKind::Refresh)));
    }

    #[test]
    fn refresh_distinguishes_expired_from_invalid() {
        let security = security();
        let iat = SystemTime::now() - Duration::from_secs(120);
        let expired = issue_token(
            TokenKind::Refresh,
            "u@x.com",
            Duration::from_secs(60),
            iat,
            &security,
        )
        .unwrap();

        let err = refresh(&security, &expired, SystemTime::now()).unwrap_err();
        assert_eq!(err.message(), "Expired refresh token");

        let err = refresh(&security, "garbage", SystemTime::now()).unwrap_err();
        assert_eq!(err.message(), "Invalid refresh token");
    }
}
