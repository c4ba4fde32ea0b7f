//! Local instance health checker library.
//!
//! Periodically runs named HTTP/TCP probes, debounces their results into a
//! stable per-check status, and reports the aggregate verdict to a fleet
//! manager.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod observability;
pub mod probe;
pub mod report;

pub use config::schema::HealthCheckerConfig;
pub use health::{Registry, StatusSmoother};
pub use lifecycle::Shutdown;
