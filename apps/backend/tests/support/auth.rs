//! Register/login helpers driven through the HTTP surface.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, Error};
use backend_test_support::envelope::assert_success;
use backend_test_support::unique_helpers::unique_email;
use serde_json::json;

pub const TEST_PASSWORD: &str = "password1";

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl TestUser {
    pub fn bearer(&self) -> String {
        bearer(&self.access_token)
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

pub async fn register<S>(app: &S, email: &str, password: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

pub async fn login<S>(app: &S, email: &str, password: &str) -> ServiceResponse<BoxBody>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": password }))
        .to_request();
    test::call_service(app, req).await
}

/// Register a fresh user and log them in.
pub async fn signed_in_user<S>(app: &S) -> TestUser
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = Error>,
{
    let email = unique_email("user");

    let data = assert_success(register(app, &email, TEST_PASSWORD).await, StatusCode::CREATED).await;
    let id = data["user_id"].as_i64().expect("user_id");

    let tokens = assert_success(login(app, &email, TEST_PASSWORD).await, StatusCode::OK).await;

    TestUser {
        id,
        email,
        access_token: tokens["access_token"].as_str().expect("access_token").to_string(),
        refresh_token: tokens["refresh_token"].as_str().expect("refresh_token").to_string(),
    }
}
