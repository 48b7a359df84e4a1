//! Helpers shared by the backend's unit and integration tests: logging
//! setup, unique fixture data and envelope assertions.

pub mod envelope;
pub mod logging;
pub mod unique_helpers;
