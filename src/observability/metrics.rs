//! Metrics collection and exposition.
//!
//! # Metrics
//! - `healthchecker_probe_total` (counter): probe invocations by check, result
//! - `healthchecker_check_healthy` (gauge): 1=healthy, 0=failing, per check
//! - `healthchecker_failing_checks` (gauge): size of the last snapshot
//! - `healthchecker_reports_total` (counter): reporter calls by intent, result

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(check: &str, ok: bool) {
    let result = if ok { "ok" } else { "failed" };
    metrics::counter!(
        "healthchecker_probe_total",
        "check" => check.to_string(),
        "result" => result
    )
    .increment(1);
}

pub fn record_check_health(check: &str, healthy: bool) {
    metrics::gauge!("healthchecker_check_healthy", "check" => check.to_string())
        .set(if healthy { 1.0 } else { 0.0 });
}

pub fn record_failing_checks(count: usize) {
    metrics::gauge!("healthchecker_failing_checks").set(count as f64);
}

pub fn record_report(healthy: bool, success: bool) {
    let intent = if healthy { "healthy" } else { "unhealthy" };
    let result = if success { "ok" } else { "error" };
    metrics::counter!(
        "healthchecker_reports_total",
        "intent" => intent,
        "result" => result
    )
    .increment(1);
}
