use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::extractors::ValidatedJson;
use crate::http::envelope;
use crate::infra::db::require_db;
use crate::services::auth;
use crate::state::app_state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsRequest {
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8))]
    pub password: String,
}

/// An empty or missing token is not a shape error; it fails verification
/// like any other bad token.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct MatchTokenRequest {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user_id: i64,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
}

async fn register(
    body: ValidatedJson<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let user = auth::register(db, &body.email, &body.password).await?;

    Ok(envelope::created(UserResponse {
        user_id: user.id,
        email: user.email,
    }))
}

async fn login(
    body: ValidatedJson<CredentialsRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let pair = auth::login(
        db,
        &app_state.security,
        &body.email,
        &body.password,
        SystemTime::now(),
    )
    .await?;

    Ok(envelope::ok(TokenPairResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

async fn refresh_token(
    body: ValidatedJson<RefreshTokenRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let access_token = auth::refresh(&app_state.security, &body.refresh_token, SystemTime::now())?;
    Ok(envelope::ok(AccessTokenResponse { access_token }))
}

async fn match_token(
    body: ValidatedJson<MatchTokenRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let user = auth::validate(db, &app_state.security, &body.access_token, SystemTime::now()).await?;

    Ok(envelope::ok(UserResponse {
        user_id: user.id,
        email: user.email,
    }))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/register", web::post().to(register))
        .route("/login", web::post().to(login))
        .route("/refresh-token", web::post().to(refresh_token))
        .route("/match-token", web::post().to(match_token));
}
