//! Debounced per-check status.
//!
//! # States
//! - Healthy: `consecutive_failures < threshold`
//! - Failing: `consecutive_failures == threshold`
//!
//! # State Transitions
//! ```text
//! Healthy → Failing: `threshold` consecutive failures
//! Failing → Healthy: `success_threshold` consecutive successes (default 1)
//! ```
//!
//! While healthy, any success zeroes the failure counter at once. During the
//! grace period after construction, updates are still applied but `check()`
//! reports `Ok` regardless of the counters.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use tokio::time::Instant;

use crate::health::outcome::{HealthSource, Outcome};
use crate::observability::metrics;

#[derive(Debug, Default)]
struct SmootherState {
    consecutive_failures: u32,
    /// Only counted while failing.
    consecutive_successes: u32,
    last_outcome: Option<Outcome>,
    last_failure: Option<String>,
}

/// Turns a stream of raw probe outcomes into a debounced status.
#[derive(Debug)]
pub struct StatusSmoother {
    name: String,
    threshold: u32,
    success_threshold: u32,
    grace_period: Duration,
    created_at: Instant,
    state: Mutex<SmootherState>,
}

impl StatusSmoother {
    /// Create a smoother that fails after `threshold` consecutive failures.
    /// A threshold of 0 is treated as 1.
    pub fn new(name: impl Into<String>, threshold: u32) -> Self {
        Self {
            name: name.into(),
            threshold: threshold.max(1),
            success_threshold: 1,
            grace_period: Duration::ZERO,
            created_at: Instant::now(),
            state: Mutex::new(SmootherState::default()),
        }
    }

    /// Require `successes` consecutive successes before a failing check
    /// reports healthy again.
    pub fn with_success_threshold(mut self, successes: u32) -> Self {
        self.success_threshold = successes.max(1);
        self
    }

    /// Report `Ok` for `grace` after construction, whatever the counters say.
    pub fn with_grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    fn lock(&self) -> MutexGuard<'_, SmootherState> {
        // Counters stay consistent under every partial update, so a
        // poisoned lock is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Feed one raw probe outcome and return the verdict `check()` now
    /// reports (`true` when healthy).
    pub fn record(&self, outcome: Outcome) -> bool {
        let in_grace = self.in_grace();
        let mut state = self.lock();

        match &outcome {
            Outcome::Ok => {
                if state.consecutive_failures >= self.threshold {
                    state.consecutive_successes += 1;
                    if state.consecutive_successes >= self.success_threshold {
                        state.consecutive_failures = 0;
                        state.consecutive_successes = 0;
                        tracing::info!(check = %self.name, "Check recovered");
                    }
                } else {
                    state.consecutive_failures = 0;
                }
            }
            Outcome::Failed(reason) => {
                state.consecutive_successes = 0;
                if state.consecutive_failures < self.threshold {
                    state.consecutive_failures += 1;
                    if state.consecutive_failures == self.threshold && !in_grace {
                        tracing::warn!(
                            check = %self.name,
                            failures = state.consecutive_failures,
                            threshold = self.threshold,
                            reason = %reason,
                            "Check failing"
                        );
                    }
                }
                state.last_failure = Some(reason.clone());
            }
        }

        tracing::debug!(
            check = %self.name,
            outcome = %outcome,
            failures = state.consecutive_failures,
            "Probe recorded"
        );
        metrics::record_probe(&self.name, outcome.is_ok());
        state.last_outcome = Some(outcome);

        let healthy = in_grace || state.consecutive_failures < self.threshold;
        drop(state);
        metrics::record_check_health(&self.name, healthy);
        healthy
    }

    /// Whether the grace period after construction is still running.
    pub fn in_grace(&self) -> bool {
        self.created_at.elapsed() < self.grace_period
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    /// The most recent raw outcome, if any probe has run yet.
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.lock().last_outcome.clone()
    }
}

impl HealthSource for StatusSmoother {
    fn check(&self) -> Outcome {
        if self.in_grace() {
            return Outcome::Ok;
        }

        let state = self.lock();
        if state.consecutive_failures < self.threshold {
            return Outcome::Ok;
        }

        // The counter only reaches the threshold through failures, each of
        // which stores its reason.
        Outcome::Failed(
            state
                .last_failure
                .clone()
                .unwrap_or_else(|| "check failing".to_string()),
        )
    }

    fn has_reported(&self) -> bool {
        self.lock().last_outcome.is_some()
    }
}
