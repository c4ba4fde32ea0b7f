//! Periodic probe execution.
//!
//! # Responsibilities
//! - Invoke one probe on a fixed period
//! - Feed each outcome into the check's smoother
//! - Stop when shutdown is signalled or the handle is aborted
//!
//! # Design Decisions
//! - First probe fires one period after start
//! - Missed ticks are skipped, never queued
//! - Probe errors are recorded as failures and never stop the loop

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::health::outcome::Outcome;
use crate::health::smoother::StatusSmoother;
use crate::probe::Probe;

/// Drives one probe into one smoother.
pub struct PeriodicRunner {
    probe: Box<dyn Probe>,
    smoother: Arc<StatusSmoother>,
    period: Duration,
}

impl PeriodicRunner {
    pub fn new(probe: Box<dyn Probe>, smoother: Arc<StatusSmoother>, period: Duration) -> Self {
        Self {
            probe,
            smoother,
            period,
        }
    }

    /// Spawn the loop on the current runtime and return its owning handle.
    pub fn start(self, shutdown: broadcast::Receiver<()>) -> RunnerHandle {
        let name = self.smoother.name().to_string();
        let task = tokio::spawn(self.run(shutdown));
        RunnerHandle { name, task }
    }

    /// Run until shutdown is received.
    pub async fn run(self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            check = %self.smoother.name(),
            period_ms = self.period.as_millis() as u64,
            threshold = self.smoother.threshold(),
            "Check runner starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.tick().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!(check = %self.smoother.name(), "Check runner received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    async fn tick(&self) {
        let outcome = Outcome::from(self.probe.run().await);
        self.smoother.record(outcome);
    }
}

/// Owning handle of a spawned runner.
#[derive(Debug)]
pub struct RunnerHandle {
    name: String,
    task: JoinHandle<()>,
}

impl RunnerHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stop the runner immediately, dropping any in-flight probe.
    pub fn abort(&self) {
        self.task.abort();
    }

    /// Wait for the runner to exit.
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            if !e.is_cancelled() {
                tracing::error!(check = %self.name, error = %e, "Check runner panicked");
            }
        }
    }
}
