//! Probe subsystem.
//!
//! # Data Flow
//! ```text
//! CheckConfig (type, endpoint, timeout)
//!     → build_probe()
//!     → Box<dyn Probe> (http.rs / tcp.rs)
//!     → run() on every runner tick
//!     → Result<(), ProbeError> → Outcome
//! ```
//!
//! # Design Decisions
//! - One operation per probe; no retries inside an invocation
//! - Every probe enforces its own timeout
//! - Failures are data: the error's display string is the recorded reason

pub mod http;
pub mod tcp;

use std::time::Duration;

use async_trait::async_trait;

use crate::config::{CheckConfig, CheckType};

pub use self::http::HttpProbe;
pub use self::tcp::TcpProbe;

/// Failure of a single probe invocation.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{target} timed out after {after:?}")]
    Timeout { target: String, after: Duration },

    #[error("error while checking {url}: {message}")]
    Request { url: String, message: String },

    #[error("downstream service returned unexpected status: {actual} (expected {expected})")]
    UnexpectedStatus { expected: u16, actual: u16 },
}

/// A health probe: run once, report success or a descriptive failure.
#[async_trait]
pub trait Probe: Send + Sync {
    async fn run(&self) -> Result<(), ProbeError>;
}

/// Build the probe described by a check definition.
pub fn build_probe(config: &CheckConfig) -> Box<dyn Probe> {
    let timeout = Duration::from_millis(config.timeout_ms);
    match config.check_type {
        CheckType::Tcp => Box::new(TcpProbe::new(config.endpoint.clone(), timeout)),
        CheckType::Http => Box::new(
            HttpProbe::new(config.endpoint.clone(), timeout)
                .expected_status(config.expected_status)
                .headers(config.headers.clone()),
        ),
    }
}
