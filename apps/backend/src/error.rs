use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use thiserror::Error;
use tracing::{error, warn};

use crate::auth::claims::TokenKind;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::errors::ErrorCode;
use crate::http::envelope::Envelope;
use crate::trace_ctx;

/// Every failure a handler can surface.
///
/// The rendered body is always the `{success: false, error}` envelope. The
/// message comes from [`AppError::message`], which never carries raw
/// database or library text.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation error: {detail}")]
    Validation { code: ErrorCode, detail: String },
    #[error("Conflict: {detail}")]
    Conflict { code: ErrorCode, detail: String },
    #[error("Not found: {detail}")]
    NotFound { code: ErrorCode, detail: String },
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Missing or malformed Authorization header")]
    UnauthorizedMissingBearer,
    #[error("Invalid {0} token")]
    InvalidToken(TokenKind),
    #[error("Expired {0} token")]
    ExpiredToken(TokenKind),
    #[error("User not found")]
    UserNotFound,
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Database unavailable")]
    DbUnavailable,
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { code, .. } => *code,
            AppError::Conflict { code, .. } => *code,
            AppError::NotFound { code, .. } => *code,
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::UnauthorizedMissingBearer => ErrorCode::UnauthorizedMissingBearer,
            AppError::InvalidToken(_) => ErrorCode::InvalidToken,
            AppError::ExpiredToken(_) => ErrorCode::TokenExpired,
            AppError::UserNotFound => ErrorCode::UserNotFound,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Config { .. } => ErrorCode::ConfigError,
            AppError::DbUnavailable => ErrorCode::DbUnavailable,
        }
    }

    /// Client-facing message placed in the envelope's `error` field.
    pub fn message(&self) -> String {
        match self {
            AppError::Validation { detail, .. } => detail.clone(),
            AppError::Conflict { detail, .. } => detail.clone(),
            AppError::NotFound { detail, .. } => detail.clone(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::UnauthorizedMissingBearer => {
                "Missing or malformed Authorization header".to_string()
            }
            AppError::InvalidToken(kind) => format!("Invalid {kind} token"),
            AppError::ExpiredToken(kind) => format!("Expired {kind} token"),
            AppError::UserNotFound => "User not found".to_string(),
            AppError::Internal { detail } => detail.clone(),
            AppError::Config { .. } => "Server misconfigured".to_string(),
            AppError::DbUnavailable => "Database unavailable".to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            // Login failures share the validation status so a wrong password
            // is indistinguishable from an unknown email.
            AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::UnauthorizedMissingBearer
            | AppError::InvalidToken(_)
            | AppError::ExpiredToken(_)
            | AppError::UserNotFound => StatusCode::UNAUTHORIZED,
            AppError::Internal { .. } | AppError::Config { .. } | AppError::DbUnavailable => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn invalid(detail: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationError,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::BadRequest,
            detail: detail.into(),
        }
    }

    pub fn conflict(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::NotFound {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    pub fn db_unavailable() -> Self {
        Self::DbUnavailable
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(detail) => AppError::invalid(detail),
            DomainError::Conflict(kind, detail) => {
                let code = match kind {
                    ConflictKind::UniqueEmail => ErrorCode::UniqueEmail,
                    _ => ErrorCode::Conflict,
                };
                AppError::conflict(code, detail)
            }
            DomainError::NotFound(kind, detail) => match kind {
                NotFoundKind::User => AppError::UserNotFound,
                NotFoundKind::Customer => AppError::not_found(ErrorCode::CustomerNotFound, detail),
                NotFoundKind::Order => AppError::not_found(ErrorCode::OrderNotFound, detail),
                _ => AppError::not_found(ErrorCode::NotFound, detail),
            },
            DomainError::Infra(kind, detail) => match kind {
                InfraErrorKind::DbUnavailable => AppError::DbUnavailable,
                _ => AppError::internal(detail),
            },
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        crate::infra::db_errors::map_db_err(e).into()
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            error!(trace_id = %trace_id, code = %code, error = %self, "request failed");
        } else {
            warn!(trace_id = %trace_id, code = %code, status = status.as_u16(), "request rejected");
        }

        HttpResponse::build(status)
            .insert_header(("x-trace-id", trace_id))
            .json(Envelope::<()>::failure(self.message()))
    }
}
