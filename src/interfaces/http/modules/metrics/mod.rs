//! Prometheus metrics endpoint and HTTP metrics middleware

pub mod handlers;
pub mod middleware;

pub use handlers::{detached_prometheus_handle, install_prometheus_recorder, prometheus_metrics, MetricsState};
pub use middleware::http_metrics_middleware;
