//! External service interactions
//!
//! - REST calls to the attendance backend
//! - Background execution of those calls

pub mod api;
pub mod request_runner;

pub use api::{ApiClient, FetchError, HealthStatus};
pub use request_runner::PendingRequest;
