//! Startup grace handling.
//!
//! Probes right after an instance launches are expected to fail while its
//! dependencies come up. Two pieces keep those failures from being acted on:
//!
//! - [`GraceWaiter`] blocks until uptime exceeds the grace period, optionally
//!   returning early once every check already passes.
//! - [`GraceLatch`] is the one-way `InGrace → GraceOver` gate consulted before
//!   each external report.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::{self, Instant};

use crate::health::registry::Registry;

/// Default interval between uptime samples.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Uptime in whole seconds since `launched`.
pub fn uptime_since(launched: Instant) -> impl Fn() -> u64 + Send + Sync {
    move || launched.elapsed().as_secs()
}

/// Uptime in whole seconds since a Unix timestamp, e.g. an instance launch
/// time reported by the platform. A launch time in the future counts as 0.
pub fn uptime_since_epoch(launched_unix_secs: u64) -> impl Fn() -> u64 + Send + Sync {
    move || {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        now.saturating_sub(launched_unix_secs)
    }
}

/// Blocks startup-phase evaluation until the grace period is over.
#[derive(Debug, Clone)]
pub struct GraceWaiter {
    registry: Arc<Registry>,
    poll_interval: Duration,
}

impl GraceWaiter {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Wait until `uptime() > grace`, or, when `exit_early_if_healthy` is
    /// set, until every check has run at least once and passes. Returns
    /// whether the registry snapshot was empty at the moment the wait ended.
    pub async fn wait<F>(&self, grace: Duration, uptime: F, exit_early_if_healthy: bool) -> bool
    where
        F: Fn() -> u64,
    {
        let grace_secs = grace.as_secs();
        tracing::info!(
            grace_secs,
            exit_early_if_healthy,
            "Waiting for grace period"
        );

        loop {
            let up = uptime();
            if up > grace_secs {
                let healthy = self.registry.is_healthy();
                tracing::info!(uptime_secs = up, healthy, "Grace period elapsed");
                return healthy;
            }

            if exit_early_if_healthy
                && self.registry.all_reported()
                && self.registry.is_healthy()
            {
                tracing::info!(uptime_secs = up, "All checks healthy, ending grace period early");
                return true;
            }

            tracing::debug!(uptime_secs = up, grace_secs, "In grace period");
            time::sleep(self.poll_interval).await;
        }
    }
}

/// Phase of the startup reporting gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraceState {
    InGrace,
    GraceOver,
}

/// One-way latch: once uptime has exceeded the grace period it stays over.
#[derive(Debug)]
pub struct GraceLatch {
    grace_secs: u64,
    over: AtomicBool,
}

impl GraceLatch {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace_secs: grace.as_secs(),
            over: AtomicBool::new(false),
        }
    }

    /// Advance the latch with the current uptime and return its state.
    pub fn observe(&self, uptime_secs: u64) -> GraceState {
        if self.over.load(Ordering::Acquire) {
            return GraceState::GraceOver;
        }
        if uptime_secs > self.grace_secs {
            self.over.store(true, Ordering::Release);
            tracing::info!(uptime_secs, grace_secs = self.grace_secs, "Grace period over, checks are authoritative");
            return GraceState::GraceOver;
        }
        GraceState::InGrace
    }

    pub fn state(&self) -> GraceState {
        if self.over.load(Ordering::Acquire) {
            GraceState::GraceOver
        } else {
            GraceState::InGrace
        }
    }
}
