//! Order repository functions for domain layer.

use std::fmt;

use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::adapters::orders_sea as orders_adapter;
use crate::entities::orders;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

pub const ORDER_NOT_FOUND: &str = "Order not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Unpaid,
}

impl PaymentStatus {
    /// Case-insensitive; `None` for anything but paid/unpaid.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "paid" => Some(PaymentStatus::Paid),
            "unpaid" => Some(PaymentStatus::Unpaid),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Unpaid => "unpaid",
        }
    }

    /// `paid_at` that goes with this status when written at `now`.
    pub fn paid_at(self, now: OffsetDateTime) -> Option<OffsetDateTime> {
        match self {
            PaymentStatus::Paid => Some(now),
            PaymentStatus::Unpaid => None,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub total_price: f64,
    pub payment_status: PaymentStatus,
    #[serde(serialize_with = "time::serde::rfc3339::option::serialize")]
    pub paid_at: Option<OffsetDateTime>,
    #[serde(serialize_with = "time::serde::rfc3339::serialize")]
    pub created_at: OffsetDateTime,
    #[serde(serialize_with = "time::serde::rfc3339::serialize")]
    pub updated_at: OffsetDateTime,
}

/// Fields written on create and update. `customer_id` is ignored on update.
#[derive(Debug, Clone)]
pub struct OrderInput {
    pub customer_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub total_price: f64,
    pub payment_status: PaymentStatus,
}

impl OrderInput {
    fn into_write(self, now: OffsetDateTime) -> orders_adapter::OrderWrite {
        orders_adapter::OrderWrite {
            customer_id: self.customer_id,
            product_name: self.product_name,
            quantity: self.quantity,
            total_price: self.total_price,
            payment_status: self.payment_status.as_str().to_string(),
            paid_at: self.payment_status.paid_at(now),
        }
    }
}

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Order, ORDER_NOT_FOUND)
}

pub async fn find_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<Option<Order>, DomainError> {
    orders_adapter::find_by_id(conn, order_id)
        .await?
        .map(Order::try_from)
        .transpose()
}

pub async fn require_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<Order, DomainError> {
    find_order(conn, order_id).await?.ok_or_else(not_found)
}

pub async fn list_orders<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: Option<&str>,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Order>, u64), DomainError> {
    let (rows, total) = orders_adapter::list(conn, search, offset, limit).await?;
    let orders = rows
        .into_iter()
        .map(Order::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((orders, total))
}

pub async fn create_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: OrderInput,
) -> Result<Order, DomainError> {
    let model = orders_adapter::create(conn, input.into_write(OffsetDateTime::now_utc())).await?;
    Order::try_from(model)
}

pub async fn update_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
    input: OrderInput,
) -> Result<Order, DomainError> {
    let existing = orders_adapter::find_by_id(conn, order_id)
        .await?
        .ok_or_else(not_found)?;

    let write = input.into_write(OffsetDateTime::now_utc());
    let model = orders_adapter::update(conn, existing, write).await?;
    Order::try_from(model)
}

pub async fn delete_order<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<(), DomainError> {
    match orders_adapter::delete_by_id(conn, order_id).await? {
        0 => Err(not_found()),
        _ => Ok(()),
    }
}

impl TryFrom<orders::Model> for Order {
    type Error = DomainError;

    fn try_from(model: orders::Model) -> Result<Self, Self::Error> {
        let payment_status = PaymentStatus::parse(&model.payment_status).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::Other("DataCorruption".into()),
                "Stored order has an invalid payment status",
            )
        })?;

        Ok(Self {
            id: model.id,
            customer_id: model.customer_id,
            product_name: model.product_name,
            quantity: model.quantity,
            total_price: model.total_price,
            payment_status,
            paid_at: model.paid_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
