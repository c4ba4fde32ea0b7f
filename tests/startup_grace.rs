//! Startup wiring and the one-shot grace wait against live backends.

use std::sync::Arc;
use std::time::Duration;

use local_healthchecker::config::parse_config;
use local_healthchecker::health::grace::{uptime_since, GraceWaiter};
use local_healthchecker::health::Registry;
use local_healthchecker::lifecycle::{start_checks, Shutdown};
use tokio::time::Instant;

mod common;

#[tokio::test]
async fn test_checks_healthy_after_grace() {
    let addr = common::start_mock_backend().await;
    let config = parse_config(&format!(
        r#"
frequency_secs = 1
grace_period_secs = 2

[checks.http]
type = "http"
endpoint = "http://{addr}/"
threshold = 2
timeout_ms = 1000

[checks.tcp]
type = "tcp"
endpoint = "{addr}"
"#
    ))
    .unwrap();

    let launched = Instant::now();
    let registry = Arc::new(Registry::new());
    let shutdown = Shutdown::new();
    let runners = start_checks(&config, &registry, &shutdown).unwrap();

    let healthy = GraceWaiter::new(registry.clone())
        .with_poll_interval(Duration::from_millis(200))
        .wait(
            Duration::from_secs(config.grace_period_secs),
            uptime_since(launched),
            false,
        )
        .await;

    assert!(launched.elapsed() >= Duration::from_secs(2));
    assert!(healthy);
    assert!(registry.status_snapshot().is_empty());

    shutdown.stop_all(runners).await;
}

#[tokio::test]
async fn test_failing_check_holds_early_exit_until_grace() {
    let closed = common::closed_port().await;
    let config = parse_config(&format!(
        r#"
frequency_secs = 1
grace_period_secs = 2

[checks.cache]
type = "tcp"
endpoint = "{closed}"
"#
    ))
    .unwrap();

    let launched = Instant::now();
    let registry = Arc::new(Registry::new());
    let shutdown = Shutdown::new();
    let runners = start_checks(&config, &registry, &shutdown).unwrap();

    let healthy = GraceWaiter::new(registry.clone())
        .with_poll_interval(Duration::from_millis(200))
        .wait(Duration::from_secs(2), uptime_since(launched), true)
        .await;

    // The check never passes, so early exit cannot cut the grace period short.
    assert!(!healthy);
    assert!(launched.elapsed() >= Duration::from_secs(2));
    assert!(registry.status_snapshot().contains_key("cache"));

    shutdown.stop_all(runners).await;
}

#[tokio::test]
async fn test_healthy_check_exits_early_after_first_result() {
    let addr = common::start_mock_backend().await;
    let config = parse_config(&format!(
        r#"
frequency_secs = 1
grace_period_secs = 30

[checks.web]
type = "http"
endpoint = "http://{addr}/"
"#
    ))
    .unwrap();

    let launched = Instant::now();
    let registry = Arc::new(Registry::new());
    let shutdown = Shutdown::new();
    let runners = start_checks(&config, &registry, &shutdown).unwrap();

    let healthy = GraceWaiter::new(registry.clone())
        .with_poll_interval(Duration::from_millis(200))
        .wait(Duration::from_secs(30), uptime_since(launched), true)
        .await;

    // Ends once the first probe has passed, well before the grace period.
    assert!(healthy);
    assert!(registry.all_reported());
    assert!(launched.elapsed() >= Duration::from_secs(1));
    assert!(launched.elapsed() < Duration::from_secs(10));

    shutdown.stop_all(runners).await;
}
