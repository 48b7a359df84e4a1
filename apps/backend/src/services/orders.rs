use sea_orm::ConnectionTrait;
use tracing::info;

use super::ListParams;
use crate::repos::customers::{self, CUSTOMER_NOT_FOUND};
use crate::repos::orders::{self, Order, OrderInput, PaymentStatus};
use crate::AppError;

pub const INVALID_PAYMENT_STATUS: &str = "Invalid payment status";

/// Raw, shape-validated order fields as received from a client.
#[derive(Debug, Clone)]
pub struct OrderRequestInput {
    pub customer_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub total_price: f64,
    pub payment_status: String,
}

/// The referenced customer must exist (reported as a validation failure, not a 404),
/// then the payment status must be paid/unpaid.
async fn resolve_input<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: OrderRequestInput,
) -> Result<OrderInput, AppError> {
    if customers::find_customer(conn, input.customer_id).await?.is_none() {
        return Err(AppError::invalid(CUSTOMER_NOT_FOUND));
    }

    let payment_status = PaymentStatus::parse(&input.payment_status)
        .ok_or_else(|| AppError::invalid(INVALID_PAYMENT_STATUS))?;

    Ok(OrderInput {
        customer_id: input.customer_id,
        product_name: input.product_name,
        quantity: input.quantity,
        total_price: input.total_price,
        payment_status,
    })
}

pub async fn list_orders<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    params: &ListParams,
) -> Result<(Vec<Order>, u64), AppError> {
    Ok(orders::list_orders(conn, params.search(), params.offset(), params.limit).await?)
}

pub async fn get_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<Order, AppError> {
    Ok(orders::require_order(conn, order_id).await?)
}

pub async fn create_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: OrderRequestInput,
) -> Result<Order, AppError> {
    let input = resolve_input(conn, input).await?;
    let order = orders::create_order(conn, input).await?;

    info!(order_id = order.id, customer_id = order.customer_id, status = %order.payment_status, "order created");
    Ok(order)
}

/// The order must already exist before its body is considered.
pub async fn ensure_order_exists<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<(), AppError> {
    orders::require_order(conn, order_id).await?;
    Ok(())
}

/// `customer_id` in the input is checked for existence but never reassigned.
/// Callers that must report a missing order before a bad body call
/// [`ensure_order_exists`] first.
pub async fn update_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
    input: OrderRequestInput,
) -> Result<Order, AppError> {
    let input = resolve_input(conn, input).await?;
    let order = orders::update_order(conn, order_id, input).await?;

    info!(order_id, status = %order.payment_status, "order updated");
    Ok(order)
}

pub async fn delete_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<(), AppError> {
    orders::delete_order(conn, order_id).await?;
    info!(order_id, "order deleted");
    Ok(())
}
