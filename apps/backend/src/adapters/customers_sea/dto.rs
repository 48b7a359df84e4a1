//! DTOs for customers_sea adapter.

#[derive(Debug, Clone)]
pub struct CustomerCreate {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    /// Already normalized to lowercase
    pub gender: String,
}

/// Email is immutable after creation, so it is absent here.
#[derive(Debug, Clone)]
pub struct CustomerUpdate {
    pub name: String,
    pub phone_number: String,
    pub gender: String,
}
