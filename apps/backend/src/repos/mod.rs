//! Repository functions for the domain layer (generic over ConnectionTrait).

pub mod customers;
pub mod orders;
pub mod users;
