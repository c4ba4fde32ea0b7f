//! Edge-triggered health reporting.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::health::grace::{GraceLatch, GraceState};
use crate::health::registry::Registry;
use crate::observability::metrics;

/// Error returned by a reporter.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to report instance as {intent}: {message}")]
    Rejected { intent: &'static str, message: String },
}

/// Notifies an external fleet manager of the instance's health.
#[async_trait]
pub trait HealthReporter: Send + Sync {
    async fn report(&self, healthy: bool) -> Result<(), ReportError>;
}

/// Reporter that only logs the intent.
#[derive(Debug, Default, Clone)]
pub struct LogReporter;

#[async_trait]
impl HealthReporter for LogReporter {
    async fn report(&self, healthy: bool) -> Result<(), ReportError> {
        if healthy {
            tracing::info!("Marking instance as healthy");
        } else {
            tracing::warn!("Marking instance as unhealthy");
        }
        Ok(())
    }
}

/// Periodically evaluates the registry and reports health transitions.
pub struct ReportLoop<F> {
    registry: Arc<Registry>,
    reporter: Arc<dyn HealthReporter>,
    latch: GraceLatch,
    uptime: F,
    period: Duration,
    /// Last state the reporter accepted. Starts healthy.
    reported_healthy: bool,
}

impl<F> ReportLoop<F>
where
    F: Fn() -> u64 + Send + Sync + 'static,
{
    pub fn new(
        registry: Arc<Registry>,
        reporter: Arc<dyn HealthReporter>,
        grace: Duration,
        uptime: F,
        period: Duration,
    ) -> Self {
        Self {
            registry,
            reporter,
            latch: GraceLatch::new(grace),
            uptime,
            period,
            reported_healthy: true,
        }
    }

    /// Whether the last successfully reported state is healthy.
    pub fn reported_healthy(&self) -> bool {
        self.reported_healthy
    }

    /// Run one evaluation. Returns the intent that was reported, if any.
    pub async fn evaluate(&mut self) -> Option<bool> {
        if self.latch.observe((self.uptime)()) == GraceState::InGrace {
            tracing::debug!("In grace period, treating instance as healthy");
            return None;
        }

        let snapshot = self.registry.status_snapshot();
        metrics::record_failing_checks(snapshot.len());
        let healthy = snapshot.is_empty();
        if healthy == self.reported_healthy {
            return None;
        }

        if !healthy {
            for (check, reason) in &snapshot {
                tracing::warn!(check = %check, reason = %reason, "Check failing");
            }
        }

        match self.reporter.report(healthy).await {
            Ok(()) => {
                metrics::record_report(healthy, true);
                self.reported_healthy = healthy;
                Some(healthy)
            }
            Err(e) => {
                metrics::record_report(healthy, false);
                tracing::error!(error = %e, "Unable to report instance health, retrying next evaluation");
                None
            }
        }
    }

    /// Evaluate on every period tick until shutdown.
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(
            period_secs = self.period.as_secs(),
            "Report loop starting"
        );

        let mut ticker = time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.evaluate().await;
                }
                _ = shutdown.recv() => {
                    tracing::info!("Report loop received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::outcome::Outcome;
    use crate::health::smoother::StatusSmoother;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingReporter {
        calls: Mutex<Vec<bool>>,
        fail: AtomicBool,
    }

    #[async_trait]
    impl HealthReporter for RecordingReporter {
        async fn report(&self, healthy: bool) -> Result<(), ReportError> {
            self.calls.lock().unwrap().push(healthy);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ReportError::Rejected {
                    intent: if healthy { "healthy" } else { "unhealthy" },
                    message: "throttled".to_string(),
                });
            }
            Ok(())
        }
    }

    fn setup(uptime: u64) -> (Arc<StatusSmoother>, Arc<RecordingReporter>, ReportLoop<impl Fn() -> u64 + Send + Sync + 'static>) {
        let registry = Arc::new(Registry::new());
        let smoother = Arc::new(StatusSmoother::new("db", 1));
        registry.register("db", smoother.clone()).unwrap();
        let reporter = Arc::new(RecordingReporter::default());
        let report_loop = ReportLoop::new(
            registry,
            reporter.clone(),
            Duration::from_secs(10),
            move || uptime,
            Duration::from_secs(1),
        );
        (smoother, reporter, report_loop)
    }

    #[tokio::test]
    async fn test_nothing_reported_in_grace() {
        let (smoother, reporter, mut report_loop) = setup(5);
        smoother.record(Outcome::failed("down"));
        assert_eq!(report_loop.evaluate().await, None);
        assert!(reporter.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reports_only_transitions() {
        let (smoother, reporter, mut report_loop) = setup(60);

        // Healthy from the start: nothing to say.
        assert_eq!(report_loop.evaluate().await, None);

        smoother.record(Outcome::failed("down"));
        assert_eq!(report_loop.evaluate().await, Some(false));
        assert_eq!(report_loop.evaluate().await, None);

        smoother.record(Outcome::Ok);
        assert_eq!(report_loop.evaluate().await, Some(true));

        assert_eq!(*reporter.calls.lock().unwrap(), vec![false, true]);
    }

    #[tokio::test]
    async fn test_failed_report_is_retried() {
        let (smoother, reporter, mut report_loop) = setup(60);
        reporter.fail.store(true, Ordering::SeqCst);
        smoother.record(Outcome::failed("down"));

        assert_eq!(report_loop.evaluate().await, None);
        assert!(report_loop.reported_healthy());

        reporter.fail.store(false, Ordering::SeqCst);
        assert_eq!(report_loop.evaluate().await, Some(false));
        assert!(!report_loop.reported_healthy());
        assert_eq!(*reporter.calls.lock().unwrap(), vec![false, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_until_shutdown() {
        let registry = Arc::new(Registry::new());
        let smoother = Arc::new(StatusSmoother::new("db", 1));
        registry.register("db", smoother.clone()).unwrap();
        smoother.record(Outcome::failed("down"));
        let reporter = Arc::new(RecordingReporter::default());

        let (tx, rx) = broadcast::channel(1);
        let report_loop = ReportLoop::new(
            registry,
            reporter.clone(),
            Duration::ZERO,
            || 1,
            Duration::from_secs(2),
        );
        let task = tokio::spawn(report_loop.run(rx));

        time::sleep(Duration::from_secs(5)).await;
        tx.send(()).unwrap();
        task.await.unwrap();

        assert_eq!(*reporter.calls.lock().unwrap(), vec![false]);
    }
}
