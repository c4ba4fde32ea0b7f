//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Register checks → Start runners
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Broadcast shutdown → Join runner tasks → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal, and no runner is started until
//!   every check has been registered
//! - Every spawned task is owned by a handle and joined on shutdown

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start_checks, StartupError};
