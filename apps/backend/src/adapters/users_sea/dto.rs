//! DTOs for users_sea adapter.

/// DTO for creating a new user. The password must already be hashed.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub email: String,
    pub password_hash: String,
}

impl UserCreate {
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password_hash: password_hash.into(),
        }
    }
}
