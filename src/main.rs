//! Local instance health checker.
//!
//! # Architecture Overview
//!
//! ```text
//!   checks.toml ──▶ config ──▶ lifecycle::startup
//!                                   │
//!              ┌────────────────────┼────────────────────┐
//!              ▼                    ▼                    ▼
//!        PeriodicRunner       PeriodicRunner       PeriodicRunner
//!         (probe::tcp)        (probe::http)             ...
//!              │                    │                    │
//!              ▼                    ▼                    ▼
//!        StatusSmoother       StatusSmoother       StatusSmoother
//!              └────────────────────┼────────────────────┘
//!                                   ▼
//!                               Registry
//!                                   │
//!                 ┌─────────────────┴─────────────────┐
//!                 ▼                                   ▼
//!        daemon: ReportLoop                 --once: GraceWaiter
//!        (edge-triggered reports)           (exit 0 healthy / 1 failing)
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::time::Instant;

use local_healthchecker::config::{self, HealthCheckerConfig, ObservabilityConfig};
use local_healthchecker::health::grace::{uptime_since, GraceWaiter};
use local_healthchecker::health::Registry;
use local_healthchecker::lifecycle::{self, signals, Shutdown};
use local_healthchecker::observability::{logging, metrics};
use local_healthchecker::report::{LogReporter, ReportLoop};

#[derive(Parser)]
#[command(name = "local-healthchecker")]
#[command(about = "Debounced local health checks for fleet-managed instances", long_about = None)]
struct Cli {
    /// Location of the checks file.
    #[arg(short, long, default_value = "/etc/local-healthchecker/checks.toml")]
    config: PathBuf,

    /// Parse and validate the checks file, print it, and exit.
    #[arg(long)]
    test_config: bool,

    /// Wait out the grace period, evaluate once, and exit 0 (healthy) or 1.
    #[arg(long)]
    once: bool,

    /// With --once, stop waiting as soon as every check passes.
    #[arg(long)]
    exit_early: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let launched = Instant::now();

    let config = match config::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            logging::init_logging(&ObservabilityConfig::default());
            tracing::error!(path = %cli.config.display(), error = %e, "Error parsing configuration file");
            return Ok(ExitCode::FAILURE);
        }
    };

    if cli.test_config {
        println!("{}", serde_json::to_string_pretty(&config.checks)?);
        return Ok(ExitCode::SUCCESS);
    }

    logging::init_logging(&config.observability);
    tracing::info!(
        checks = config.checks.len(),
        frequency_secs = config.frequency_secs,
        grace_period_secs = config.grace_period_secs,
        "local-healthchecker v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let registry = Arc::new(Registry::new());
    let shutdown = Shutdown::new();
    let runners = match lifecycle::start_checks(&config, &registry, &shutdown) {
        Ok(runners) => runners,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Ok(ExitCode::FAILURE);
        }
    };

    let code = if cli.once {
        run_once(&config, registry, launched, cli.exit_early).await?
    } else {
        run_daemon(&config, registry, launched, &shutdown).await?
    };

    shutdown.stop_all(runners).await;
    tracing::info!("Shutdown complete");
    Ok(code)
}

async fn run_once(
    config: &HealthCheckerConfig,
    registry: Arc<Registry>,
    launched: Instant,
    exit_early: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let waiter = GraceWaiter::new(registry.clone());
    waiter
        .wait(
            Duration::from_secs(config.grace_period_secs),
            uptime_since(launched),
            exit_early || config.exit_early_if_healthy,
        )
        .await;

    let snapshot = registry.status_snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    if snapshot.is_empty() {
        tracing::info!("All checks healthy");
        Ok(ExitCode::SUCCESS)
    } else {
        tracing::warn!(failing = snapshot.len(), "Checks failing");
        Ok(ExitCode::FAILURE)
    }
}

async fn run_daemon(
    config: &HealthCheckerConfig,
    registry: Arc<Registry>,
    launched: Instant,
    shutdown: &Shutdown,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let report_loop = ReportLoop::new(
        registry,
        Arc::new(LogReporter),
        Duration::from_secs(config.grace_period_secs),
        uptime_since(launched),
        Duration::from_secs(config.frequency_secs),
    );
    let reporting = tokio::spawn(report_loop.run(shutdown.subscribe()));

    let signal = signals::wait_for_termination().await?;
    tracing::info!(signal, "Signal received, shutting down");

    shutdown.trigger();
    reporting.await?;
    Ok(ExitCode::SUCCESS)
}
