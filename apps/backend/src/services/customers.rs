use sea_orm::{ConnectionTrait, DatabaseConnection};
use tracing::info;

use super::ListParams;
use crate::errors::domain::{ConflictKind, DomainError};
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::customers::{
    self, Customer, CustomerChanges, Gender, NewCustomer,
};
use crate::services::auth::EMAIL_EXISTS;
use crate::AppError;

pub const INVALID_GENDER: &str = "Invalid gender";

/// Raw, shape-validated customer fields as received from a client.
#[derive(Debug, Clone)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub gender: String,
}

fn parse_gender(raw: &str) -> Result<Gender, AppError> {
    Gender::parse(raw).ok_or_else(|| AppError::invalid(INVALID_GENDER))
}

fn duplicate_email() -> AppError {
    AppError::conflict(ErrorCode::UniqueEmail, EMAIL_EXISTS)
}

pub async fn list_customers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    params: &ListParams,
) -> Result<(Vec<Customer>, u64), AppError> {
    Ok(customers::list_customers(conn, params.search(), params.offset(), params.limit).await?)
}

pub async fn get_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<Customer, AppError> {
    Ok(customers::require_customer(conn, customer_id).await?)
}

pub async fn create_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    input: CustomerInput,
) -> Result<Customer, AppError> {
    let gender = parse_gender(&input.gender)?;

    if customers::email_taken(conn, &input.email).await? {
        return Err(duplicate_email());
    }

    let customer = customers::create_customer(
        conn,
        NewCustomer {
            name: input.name,
            email: input.email,
            phone_number: input.phone_number,
            gender,
        },
    )
    .await
    .map_err(|e| match e {
        DomainError::Conflict(ConflictKind::UniqueEmail, _) => duplicate_email(),
        other => AppError::from(other),
    })?;

    info!(customer_id = customer.id, email = %Redacted(&customer.email), "customer created");
    Ok(customer)
}

/// Email is immutable; only name, phone number and gender change.
pub async fn update_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
    name: String,
    phone_number: String,
    gender: &str,
) -> Result<Customer, AppError> {
    let gender = parse_gender(gender)?;

    let customer = customers::update_customer(
        conn,
        customer_id,
        CustomerChanges {
            name,
            phone_number,
            gender,
        },
    )
    .await?;

    info!(customer_id, "customer updated");
    Ok(customer)
}

/// Deletes the customer together with its orders.
pub async fn delete_customer(conn: &DatabaseConnection, customer_id: i64) -> Result<(), AppError> {
    customers::delete_customer(conn, customer_id).await?;
    info!(customer_id, "customer deleted");
    Ok(())
}
