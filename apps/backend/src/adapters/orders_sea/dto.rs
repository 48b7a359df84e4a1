//! DTOs for orders_sea adapter.

use time::OffsetDateTime;

/// Shared by create and update; `customer_id` is only honored on create.
#[derive(Debug, Clone)]
pub struct OrderWrite {
    pub customer_id: i64,
    pub product_name: String,
    pub quantity: i32,
    pub total_price: f64,
    pub payment_status: String,
    pub paid_at: Option<OffsetDateTime>,
}
