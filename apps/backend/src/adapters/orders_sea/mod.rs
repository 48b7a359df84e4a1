//! SeaORM adapter for order repository.

use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use super::lower_like;
use crate::entities::orders;

pub mod dto;

pub use dto::OrderWrite;

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<Option<orders::Model>, sea_orm::DbErr> {
    orders::Entity::find_by_id(order_id).one(conn).await
}

/// One page of orders plus the total number of matching rows.
/// `search` must already be lowercased; it is matched against the product name.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: Option<&str>,
    offset: u64,
    limit: u64,
) -> Result<(Vec<orders::Model>, u64), sea_orm::DbErr> {
    let mut query = orders::Entity::find();

    if let Some(term) = search {
        let pattern = format!("%{term}%");
        query = query.filter(lower_like(orders::Column::ProductName, &pattern));
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_asc(orders::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await?;

    Ok((rows, total))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: OrderWrite,
) -> Result<orders::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = orders::ActiveModel {
        id: NotSet,
        customer_id: Set(dto.customer_id),
        product_name: Set(dto.product_name),
        quantity: Set(dto.quantity),
        total_price: Set(dto.total_price),
        payment_status: Set(dto.payment_status),
        paid_at: Set(dto.paid_at),
        created_at: Set(now),
        updated_at: Set(now),
    };

    active.insert(conn).await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    existing: orders::Model,
    dto: OrderWrite,
) -> Result<orders::Model, sea_orm::DbErr> {
    let mut active: orders::ActiveModel = existing.into();
    active.product_name = Set(dto.product_name);
    active.quantity = Set(dto.quantity);
    active.total_price = Set(dto.total_price);
    active.payment_status = Set(dto.payment_status);
    active.paid_at = Set(dto.paid_at);
    active.updated_at = Set(time::OffsetDateTime::now_utc());

    active.update(conn).await
}

pub async fn delete_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    order_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let res = orders::Entity::delete_by_id(order_id).exec(conn).await?;
    Ok(res.rows_affected)
}
