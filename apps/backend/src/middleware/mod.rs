pub mod access_guard;
pub mod cors;
pub mod request_trace;
pub mod structured_logger;

pub use access_guard::AccessGuard;
pub use cors::cors_middleware;
pub use request_trace::{RequestId, RequestTrace};
pub use structured_logger::StructuredLogger;
