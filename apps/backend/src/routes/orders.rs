use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::ListQuery;
use crate::error::AppError;
use crate::extractors::validated_json::{parse_validated, read_body};
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::http::envelope;
use crate::infra::db::require_db;
use crate::repos::orders::Order;
use crate::services::orders::{self as order_service, OrderRequestInput};
use crate::state::app_state::AppState;

pub const ORDER_DELETED: &str = "Order deleted successfully";

#[derive(Debug, Deserialize, Validate)]
pub struct OrderRequest {
    #[serde(default)]
    #[validate(range(min = 1))]
    pub customer_id: i64,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub product_name: String,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub total_price: f64,
    #[serde(default)]
    #[validate(length(min = 1))]
    pub payment_status: String,
}

impl From<OrderRequest> for OrderRequestInput {
    fn from(req: OrderRequest) -> Self {
        Self {
            customer_id: req.customer_id,
            product_name: req.product_name,
            quantity: req.quantity,
            total_price: req.total_price,
            payment_status: req.payment_status,
        }
    }
}

#[derive(Debug, Serialize)]
struct OrderListResponse {
    orders: Vec<Order>,
    count: u64,
}

async fn list_orders(
    _user: CurrentUser,
    query: web::Query<ListQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner().into_params()?;
    let db = require_db(&app_state)?;
    let (orders, count) = order_service::list_orders(db, &params).await?;

    Ok(envelope::ok(OrderListResponse { orders, count }))
}

async fn get_order(
    _user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let order = order_service::get_order(db, path.into_inner()).await?;
    Ok(envelope::ok(order))
}

async fn create_order(
    _user: CurrentUser,
    body: ValidatedJson<OrderRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let order = order_service::create_order(db, body.into_inner().into()).await?;
    Ok(envelope::created(order))
}

/// A missing order is reported before anything about the body.
async fn update_order(
    _user: CurrentUser,
    path: web::Path<i64>,
    mut payload: web::Payload,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let order_id = path.into_inner();
    let db = require_db(&app_state)?;
    order_service::ensure_order_exists(db, order_id).await?;

    let body = read_body(&mut payload).await?;
    let request: OrderRequest = parse_validated(&body)?;
    let order = order_service::update_order(db, order_id, request.into()).await?;
    Ok(envelope::ok(order))
}

async fn delete_order(
    _user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    order_service::delete_order(db, path.into_inner()).await?;
    Ok(envelope::ok(ORDER_DELETED))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("")
            .route(web::get().to(list_orders))
            .route(web::post().to(create_order)),
    )
    .service(
        web::resource("/{id}")
            .route(web::get().to(get_order))
            .route(web::put().to(update_order))
            .route(web::delete().to(delete_order)),
    );
}
