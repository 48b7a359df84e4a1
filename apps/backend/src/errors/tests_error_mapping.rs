// Unit tests for error mapping - pure domain logic without HTTP or database dependencies
use actix_web::body::to_bytes;
use actix_web::ResponseError;

use crate::auth::claims::TokenKind;
use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::{AppError, ErrorCode};

#[test]
fn maps_validation_to_400() {
    let app: AppError = DomainError::validation("Invalid gender").into();
    assert_eq!(app.code(), ErrorCode::ValidationError);
    assert_eq!(app.status().as_u16(), 400);
    assert_eq!(app.message(), "Invalid gender");
}

#[test]
fn maps_unique_email_conflict_to_400() {
    let app: AppError =
        DomainError::conflict(ConflictKind::UniqueEmail, "Email already exists").into();
    assert_eq!(app.code(), ErrorCode::UniqueEmail);
    assert_eq!(app.status().as_u16(), 400);
    assert_eq!(app.message(), "Email already exists");

    let other: AppError =
        DomainError::conflict(ConflictKind::Other("x".into()), "generic conflict").into();
    assert_eq!(other.code(), ErrorCode::Conflict);
}

#[test]
fn maps_not_found() {
    let app: AppError =
        DomainError::not_found(NotFoundKind::Customer, "Customer not found").into();
    assert_eq!(app.code(), ErrorCode::CustomerNotFound);
    assert_eq!(app.status().as_u16(), 404);

    let app: AppError = DomainError::not_found(NotFoundKind::Order, "Order not found").into();
    assert_eq!(app.code(), ErrorCode::OrderNotFound);
    assert_eq!(app.message(), "Order not found");

    // A missing user is an authentication failure, not a 404
    let app: AppError = DomainError::not_found(NotFoundKind::User, "no user").into();
    assert!(matches!(app, AppError::UserNotFound));
    assert_eq!(app.status().as_u16(), 401);
}

#[test]
fn maps_infra_without_leaking_detail() {
    let down: AppError = DomainError::infra(InfraErrorKind::DbUnavailable, "down").into();
    assert_eq!(down.code(), ErrorCode::DbUnavailable);
    assert_eq!(down.status().as_u16(), 500);
    assert_eq!(down.message(), "Database unavailable");

    let cfg = AppError::config("SECRET_KEY must be set");
    assert_eq!(cfg.status().as_u16(), 500);
    assert_eq!(cfg.message(), "Server misconfigured");
}

#[test]
fn token_errors_carry_the_token_kind() {
    assert_eq!(
        AppError::InvalidToken(TokenKind::Refresh).message(),
        "Invalid refresh token"
    );
    assert_eq!(
        AppError::ExpiredToken(TokenKind::Refresh).message(),
        "Expired refresh token"
    );
    assert_eq!(
        AppError::InvalidToken(TokenKind::Access).message(),
        "Invalid access token"
    );
    assert_eq!(AppError::ExpiredToken(TokenKind::Access).status().as_u16(), 401);
}

#[test]
fn invalid_credentials_is_a_400() {
    let app = AppError::InvalidCredentials;
    assert_eq!(app.status().as_u16(), 400);
    assert_eq!(app.message(), "Invalid credentials");
}

#[actix_web::test]
async fn error_response_renders_failure_envelope() {
    let resp = AppError::not_found(ErrorCode::CustomerNotFound, "Customer not found").error_response();
    assert_eq!(resp.status().as_u16(), 404);
    assert!(resp.headers().contains_key("x-trace-id"));

    let body = to_bytes(resp.into_body()).await.expect("body");
    let json: serde_json::Value = serde_json::from_slice(&body).expect("json");
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Customer not found");
    assert!(json.get("data").is_none());
}
