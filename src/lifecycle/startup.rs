//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn validated check definitions into probes and smoothers
//! - Register every check before any runner starts
//! - Start one runner per check

use std::sync::Arc;
use std::time::Duration;

use crate::config::HealthCheckerConfig;
use crate::health::registry::{Registry, RegistryError};
use crate::health::runner::{PeriodicRunner, RunnerHandle};
use crate::health::smoother::StatusSmoother;
use crate::lifecycle::Shutdown;
use crate::probe::build_probe;

/// Fatal startup error.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid check set: {0}")]
    Registry(#[from] RegistryError),
}

/// Register every configured check in `registry` and start its runner.
///
/// Nothing is spawned if any registration fails.
pub fn start_checks(
    config: &HealthCheckerConfig,
    registry: &Registry,
    shutdown: &Shutdown,
) -> Result<Vec<RunnerHandle>, StartupError> {
    let mut runners = Vec::with_capacity(config.checks.len());

    for (name, check) in &config.checks {
        let smoother = Arc::new(
            StatusSmoother::new(name.clone(), check.threshold)
                .with_success_threshold(check.success_threshold)
                .with_grace_period(Duration::from_secs(check.grace_period_secs)),
        );
        registry.register(name.clone(), smoother.clone())?;

        let period = Duration::from_secs(config.frequency_of(check));
        runners.push(PeriodicRunner::new(build_probe(check), smoother, period));

        tracing::info!(
            check = %name,
            kind = ?check.check_type,
            endpoint = %check.endpoint,
            threshold = check.threshold,
            period_secs = period.as_secs(),
            "Check configured"
        );
    }

    Ok(runners
        .into_iter()
        .map(|runner| runner.start(shutdown.subscribe()))
        .collect())
}
