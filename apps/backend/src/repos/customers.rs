//! Customer repository functions for domain layer.

use std::fmt;

use sea_orm::{ConnectionTrait, TransactionTrait};
use serde::Serialize;

use crate::adapters::customers_sea as customers_adapter;
use crate::entities::customers;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

pub const CUSTOMER_NOT_FOUND: &str = "Customer not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive; `None` for anything but male/female.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub gender: Gender,
    #[serde(serialize_with = "time::serde::rfc3339::serialize")]
    pub created_at: time::OffsetDateTime,
    #[serde(serialize_with = "time::serde::rfc3339::serialize")]
    pub updated_at: time::OffsetDateTime,
}

#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub gender: Gender,
}

#[derive(Debug, Clone)]
pub struct CustomerChanges {
    pub name: String,
    pub phone_number: String,
    pub gender: Gender,
}

fn not_found() -> DomainError {
    DomainError::not_found(NotFoundKind::Customer, CUSTOMER_NOT_FOUND)
}

pub async fn find_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<Option<Customer>, DomainError> {
    customers_adapter::find_by_id(conn, customer_id)
        .await?
        .map(Customer::try_from)
        .transpose()
}

pub async fn require_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
) -> Result<Customer, DomainError> {
    find_customer(conn, customer_id).await?.ok_or_else(not_found)
}

pub async fn email_taken<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<bool, DomainError> {
    Ok(customers_adapter::count_by_email(conn, email).await? > 0)
}

pub async fn list_customers<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    search: Option<&str>,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Customer>, u64), DomainError> {
    let (rows, total) = customers_adapter::list(conn, search, offset, limit).await?;
    let customers = rows
        .into_iter()
        .map(Customer::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok((customers, total))
}

pub async fn create_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer: NewCustomer,
) -> Result<Customer, DomainError> {
    let dto = customers_adapter::CustomerCreate {
        name: customer.name,
        email: customer.email,
        phone_number: customer.phone_number,
        gender: customer.gender.as_str().to_string(),
    };
    let model = customers_adapter::create(conn, dto).await?;
    Customer::try_from(model)
}

pub async fn update_customer<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    customer_id: i64,
    changes: CustomerChanges,
) -> Result<Customer, DomainError> {
    let existing = customers_adapter::find_by_id(conn, customer_id)
        .await?
        .ok_or_else(not_found)?;

    let dto = customers_adapter::CustomerUpdate {
        name: changes.name,
        phone_number: changes.phone_number,
        gender: changes.gender.as_str().to_string(),
    };
    let model = customers_adapter::update(conn, existing, dto).await?;
    Customer::try_from(model)
}

/// Removes the customer and all of its orders atomically.
pub async fn delete_customer<C: TransactionTrait>(
    conn: &C,
    customer_id: i64,
) -> Result<(), DomainError> {
    match customers_adapter::delete_with_orders(conn, customer_id).await? {
        0 => Err(not_found()),
        _ => Ok(()),
    }
}

impl TryFrom<customers::Model> for Customer {
    type Error = DomainError;

    fn try_from(model: customers::Model) -> Result<Self, Self::Error> {
        let gender = Gender::parse(&model.gender).ok_or_else(|| {
            DomainError::infra(
                InfraErrorKind::Other("DataCorruption".into()),
                "Stored customer has an invalid gender",
            )
        })?;

        Ok(Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone_number: model.phone_number,
            gender,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Gender;

    #[test]
    fn gender_parse_is_case_insensitive() {
        assert_eq!(Gender::parse("Male"), Some(Gender::Male));
        assert_eq!(Gender::parse("FEMALE"), Some(Gender::Female));
        assert_eq!(Gender::parse("other"), None);
        assert_eq!(Gender::parse(""), None);
    }

    #[test]
    fn gender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
    }
}
