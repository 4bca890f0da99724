//! Telemetry: tracing setup, component health, and internal metrics.

pub mod health;
pub mod metrics;
pub mod tracing_setup;

pub use health::{health, HealthRegistry, HealthReport, HealthStatus};
pub use metrics::{metrics, Metrics, MetricsSnapshot};
pub use tracing_setup::{init_tracing, init_tracing_from_env, TracingConfig};
