use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ListQuery;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::http::envelope;
use crate::infra::db::require_db;
use crate::repos::customers::Customer;
use crate::services::customers::{self as customer_service, CustomerInput};
use crate::state::app_state::AppState;

pub const CUSTOMER_DELETED: &str = "Customer deleted successfully";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 7, max = 14))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub gender: String,
}

/// Email is not part of an update.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[serde(default)]
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    #[validate(length(min = 7, max = 14))]
    pub phone_number: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub gender: String,
}

#[derive(Debug, Serialize)]
struct CustomerListResponse {
    customers: Vec<Customer>,
    count: u64,
}

async fn list_customers(
    _user: CurrentUser,
    query: web::Query<ListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner().into_params()?;
    let db = require_db(&app_state)?;
    let (customers, count) = customer_service::list_customers(db, &params).await?;

    Ok(envelope::ok(CustomerListResponse { customers, count }))
}

async fn get_customer(
    _user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let customer = customer_service::get_customer(db, path.into_inner()).await?;
    Ok(envelope::ok(customer))
}

async fn create_customer(
    _user: CurrentUser,
    body: ValidatedJson<CreateCustomerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let customer = customer_service::create_customer(
        db,
        CustomerInput {
            name: body.name,
            email: body.email,
            phone_number: body.phone_number,
            gender: body.gender,
        },
    )
    .await?;

    Ok(envelope::created(customer))
}

async fn update_customer(
    _user: CurrentUser,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateCustomerRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let body = body.into_inner();
    let customer = customer_service::update_customer(
        db,
        path.into_inner(),
        body.name,
        body.phone_number,
        &body.gender,
    )
    .await?;

    Ok(envelope::ok(customer))
}

async fn delete_customer(
    _user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    customer_service::delete_customer(db, path.into_inner()).await?;
    Ok(envelope::ok(CUSTOMER_DELETED))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_customers))
            .route(web::post().to(create_customer)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_customer))
            .route(web::put().to(update_customer))
            .route(web::delete().to(delete_customer)),
    );
}
