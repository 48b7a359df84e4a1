//! User repository functions for domain layer (generic over ConnectionTrait).

use sea_orm::ConnectionTrait;

use crate::adapters::users_sea as users_adapter;
use crate::entities::users;
use crate::errors::domain::DomainError;

/// User domain model. Deliberately not `Serialize`: it carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: time::OffsetDateTime,
    pub updated_at: time::OffsetDateTime,
}

pub async fn find_user_by_email<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_email(conn, email).await?;
    Ok(user.map(User::from))
}

pub async fn email_registered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
) -> Result<bool, DomainError> {
    Ok(users_adapter::count_users_by_email(conn, email).await? > 0)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    email: &str,
    password_hash: &str,
) -> Result<User, DomainError> {
    let dto = users_adapter::UserCreate::new(email, password_hash);
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

/// Returns whether a row was removed.
///
/// No HTTP route deletes users; this is the hook for admin tooling and for
/// tests that exercise tokens whose subject has gone away.
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<bool, DomainError> {
    Ok(users_adapter::delete_user(conn, user_id).await? > 0)
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
