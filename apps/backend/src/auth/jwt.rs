//! Token issuance and verification (HS256, single process-wide secret).
//!
//! Expiry is checked here rather than by `jsonwebtoken` so that the caller
//! supplies `now`. A token is expired once `now >= exp`; there is no leeway.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::auth::claims::{Claims, TokenKind};
use crate::state::security_config::SecurityConfig;
use crate::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Malformed, tampered, or signed with another key
    #[error("invalid signature")]
    InvalidSignature,
    /// Signature valid but `now >= exp`
    #[error("expired")]
    Expired,
}

impl TokenError {
    /// Translate into the caller-facing error for the kind of token the caller expected.
    pub fn into_app_error(self, expected: TokenKind) -> AppError {
        match self {
            TokenError::InvalidSignature => AppError::InvalidToken(expected),
            TokenError::Expired => AppError::ExpiredToken(expected),
        }
    }
}

fn unix_secs(now: SystemTime) -> Result<i64, AppError> {
    now.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .map_err(|_| AppError::internal("Failed to get current time"))
}

/// Mint a token of `kind` using the TTL configured for that kind.
pub fn mint_token(
    kind: TokenKind,
    subject: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    issue_token(kind, subject, security.ttl_for(kind), now, security)
}

/// Mint a token with an explicit TTL: `exp = iat + ttl`.
pub fn issue_token(
    kind: TokenKind,
    subject: &str,
    ttl: Duration,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let iat = unix_secs(now)?;
    let claims = Claims {
        token_type: kind,
        sub: subject.to_string(),
        iat,
        exp: iat + ttl.as_secs() as i64,
    };

    encode(
        &Header::new(security.algorithm),
        &claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|_| AppError::internal("Failed to sign token"))
}

/// Verify signature and expiry; both checks are mandatory.
pub fn verify_token(
    token: &str,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(security.algorithm);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let claims = decode::<Claims>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::InvalidSignature)?;

    let now = unix_secs(now).map_err(|_| TokenError::Expired)?;
    if now >= claims.exp {
        return Err(TokenError::Expired);
    }

    Ok(claims)
}
