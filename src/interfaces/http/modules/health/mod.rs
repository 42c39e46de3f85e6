//! Liveness and dependency health

pub mod handlers;

pub use handlers::{health_check, HealthResponse, HealthState};
