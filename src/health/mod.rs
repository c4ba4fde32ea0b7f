//! Health-state aggregation engine.
//!
//! # Data Flow
//! ```text
//! Probe (probe/)
//!     → runner.rs (timer tick, one task per check)
//!     → smoother.rs record(outcome)
//!     → registry.rs status_snapshot() (pull, on demand)
//!     → report/ (external fleet-health notifier)
//!
//! Startup (grace.rs):
//!     GraceWaiter blocks until uptime > grace (or all checks pass)
//!     GraceLatch: InGrace → GraceOver, gates reporting
//! ```
//!
//! # Design Decisions
//! - One lock per smoother; checks never contend with each other
//! - Registry is read-mostly behind an RwLock, populated at startup
//! - Snapshots are approximate across checks, not a consistent cut

pub mod grace;
pub mod outcome;
pub mod registry;
pub mod runner;
pub mod smoother;

pub use grace::{GraceLatch, GraceState, GraceWaiter};
pub use outcome::{HealthSource, Outcome};
pub use registry::{Registry, RegistryError, StatusSnapshot};
pub use runner::{PeriodicRunner, RunnerHandle};
pub use smoother::StatusSmoother;
