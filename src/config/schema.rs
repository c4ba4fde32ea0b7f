//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the health
//! checker. All types derive Serde traits for deserialization from TOML.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthCheckerConfig {
    /// Default check period in seconds, used when a check sets none.
    pub frequency_secs: u64,

    /// Startup grace period in seconds, measured against uptime.
    pub grace_period_secs: u64,

    /// End the startup grace early once every check passes.
    pub exit_early_if_healthy: bool,

    /// Check definitions keyed by unique name.
    pub checks: BTreeMap<String, CheckConfig>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for HealthCheckerConfig {
    fn default() -> Self {
        Self {
            frequency_secs: 10,
            grace_period_secs: 300, // 5 minutes
            exit_early_if_healthy: false,
            checks: BTreeMap::new(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl HealthCheckerConfig {
    /// Period of `check`, falling back to the global frequency.
    pub fn frequency_of(&self, check: &CheckConfig) -> u64 {
        check.frequency_secs.unwrap_or(self.frequency_secs)
    }
}

/// Probe type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    Http,
    Tcp,
}

/// A single named check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CheckConfig {
    /// Probe type ("http" or "tcp", case insensitive).
    #[serde(rename = "type", deserialize_with = "de_check_type")]
    pub check_type: CheckType,

    /// URL for HTTP checks, `host:port` for TCP checks.
    pub endpoint: String,

    /// Per-probe timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Consecutive failures before the check reports failing.
    #[serde(default = "default_threshold")]
    pub threshold: u32,

    /// Consecutive successes before a failing check reports healthy again.
    #[serde(default = "default_threshold")]
    pub success_threshold: u32,

    /// Check period in seconds; the global frequency when unset.
    #[serde(default)]
    pub frequency_secs: Option<u64>,

    /// Seconds after startup during which this check always reports healthy.
    #[serde(default)]
    pub grace_period_secs: u64,

    /// Expected HTTP status code.
    #[serde(default = "default_expected_status")]
    pub expected_status: u16,

    /// Extra HTTP request headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_timeout_ms() -> u64 {
    1000
}

fn default_threshold() -> u32 {
    1
}

fn default_expected_status() -> u16 {
    200
}

fn de_check_type<'de, D>(deserializer: D) -> Result<CheckType, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    match raw.to_ascii_lowercase().as_str() {
        "http" => Ok(CheckType::Http),
        "tcp" => Ok(CheckType::Tcp),
        other => Err(serde::de::Error::unknown_variant(other, &["http", "tcp"])),
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}
