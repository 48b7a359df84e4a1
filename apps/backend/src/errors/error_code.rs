//! Stable machine-readable codes attached to every error log line.
//!
//! Codes never appear in response bodies; the envelope only carries the
//! human-readable message. They exist so log queries don't depend on prose.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ValidationError,
    BadRequest,
    UniqueEmail,
    Conflict,
    CustomerNotFound,
    OrderNotFound,
    NotFound,
    InvalidCredentials,
    UnauthorizedMissingBearer,
    InvalidToken,
    TokenExpired,
    UserNotFound,
    DbUnavailable,
    ConfigError,
    InternalError,
}

impl ErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::UniqueEmail => "UNIQUE_EMAIL",
            Self::Conflict => "CONFLICT",
            Self::CustomerNotFound => "CUSTOMER_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::ConfigError => "CONFIG_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
