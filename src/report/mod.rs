//! Reporting subsystem.
//!
//! # Data Flow
//! ```text
//! ReportLoop (every global frequency tick)
//!     → GraceLatch: InGrace → nothing is reported
//!     → Registry::status_snapshot()
//!     → failure count crosses 0 ↔ non-zero vs last reported state?
//!     → HealthReporter::report(healthy)
//! ```
//!
//! # Design Decisions
//! - The fleet-manager call is an external collaborator behind a trait
//! - The remembered state only changes after a successful report, so a
//!   failed call is re-attempted on the next tick
//! - Reporter errors are logged and never touch local health state

pub mod reporter;

pub use reporter::{HealthReporter, LogReporter, ReportError, ReportLoop};
