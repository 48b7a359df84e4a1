//! SeaORM adapter for customer repository.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, NotSet,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use super::lower_like;
use crate::entities::{customers, orders};

pub mod dto;

pub use dto::{CustomerCreate, CustomerUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<Option<customers::Model>, sea_orm::DbErr> {
    customers::Entity::find_by_id(customer_id).one(conn).await
}

pub async fn count_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<u64, sea_orm::DbErr> {
    customers::Entity::find()
        .filter(customers::Column::Email.eq(email))
        .count(conn)
        .await
}

/// One page of customers plus the total number of matching rows.
///
/// `search` must already be lowercased; it is matched as a substring of
/// name, email or phone number.
pub async fn list<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: Option<&str>,
    offset: u64,
    limit: u64,
) -> Result<(Vec<customers::Model>, u64), sea_orm::DbErr> {
    let mut query = customers::Entity::find();

    if let Some(term) = search {
        let pattern = format!("%{term}%");
        query = query.filter(
            Condition::any()
                .add(lower_like(customers::Column::Name, &pattern))
                .add(lower_like(customers::Column::Email, &pattern))
                .add(lower_like(customers::Column::PhoneNumber, &pattern)),
        );
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_asc(customers::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await?;

    Ok((rows, total))
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: CustomerCreate,
) -> Result<customers::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let active = customers::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        email: Set(dto.email),
        phone_number: Set(dto.phone_number),
        gender: Set(dto.gender),
        created_at: Set(now),
        updated_at: Set(now),
    };

    active.insert(conn).await
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    existing: customers::Model,
    dto: CustomerUpdate,
) -> Result<customers::Model, sea_orm::DbErr> {
    let mut active: customers::ActiveModel = existing.into();
    active.name = Set(dto.name);
    active.phone_number = Set(dto.phone_number);
    active.gender = Set(dto.gender);
    active.updated_at = Set(time::OffsetDateTime::now_utc());

    active.update(conn).await
}

/// Delete a customer and its orders in one transaction. Returns customer rows removed.
pub async fn delete_with_orders<C: TransactionTrait>(
    conn: &C,
    customer_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let txn = conn.begin().await?;

    orders::Entity::delete_many()
        .filter(orders::Column::CustomerId.eq(customer_id))
        .exec(&txn)
        .await?;
    let res = customers::Entity::delete_by_id(customer_id)
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(res.rows_affected)
}
