//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → HealthCheckerConfig (validated, immutable)
//!     → lifecycle/startup.rs builds probes, smoothers and runners
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the check set never changes at runtime
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{CheckConfig, CheckType, HealthCheckerConfig, LogFormat, ObservabilityConfig};
pub use validation::ValidationError;
