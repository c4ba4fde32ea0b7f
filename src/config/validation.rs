//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (thresholds, periods and timeouts > 0)
//! - Validate endpoints against their probe type
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HealthCheckerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::{CheckConfig, CheckType, HealthCheckerConfig};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("global frequency_secs must be greater than 0")]
    ZeroGlobalFrequency,

    #[error("check '{check}': {field} must be greater than 0")]
    ZeroValue { check: String, field: &'static str },

    #[error("check '{check}': endpoint is empty")]
    EmptyEndpoint { check: String },

    #[error("check '{check}': invalid HTTP endpoint '{endpoint}': {reason}")]
    InvalidUrl {
        check: String,
        endpoint: String,
        reason: String,
    },

    #[error("check '{check}': TCP endpoint '{endpoint}' must be host:port")]
    InvalidAddress { check: String, endpoint: String },

    #[error("check '{check}': invalid expected_status {status}")]
    InvalidStatus { check: String, status: u16 },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &HealthCheckerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.frequency_secs == 0 {
        errors.push(ValidationError::ZeroGlobalFrequency);
    }

    for (name, check) in &config.checks {
        validate_check(name, check, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_check(name: &str, check: &CheckConfig, errors: &mut Vec<ValidationError>) {
    let zero = |field| ValidationError::ZeroValue {
        check: name.to_string(),
        field,
    };

    if check.threshold == 0 {
        errors.push(zero("threshold"));
    }
    if check.success_threshold == 0 {
        errors.push(zero("success_threshold"));
    }
    if check.timeout_ms == 0 {
        errors.push(zero("timeout_ms"));
    }
    if check.frequency_secs == Some(0) {
        errors.push(zero("frequency_secs"));
    }

    let endpoint = check.endpoint.trim();
    if endpoint.is_empty() {
        errors.push(ValidationError::EmptyEndpoint {
            check: name.to_string(),
        });
        return;
    }

    match check.check_type {
        CheckType::Http => {
            match Url::parse(endpoint) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                Ok(url) => errors.push(ValidationError::InvalidUrl {
                    check: name.to_string(),
                    endpoint: endpoint.to_string(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                }),
                Err(e) => errors.push(ValidationError::InvalidUrl {
                    check: name.to_string(),
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                }),
            }
            if !(100..=599).contains(&check.expected_status) {
                errors.push(ValidationError::InvalidStatus {
                    check: name.to_string(),
                    status: check.expected_status,
                });
            }
        }
        CheckType::Tcp => {
            let valid = endpoint
                .rsplit_once(':')
                .map(|(host, port)| !host.is_empty() && port.parse::<u16>().is_ok())
                .unwrap_or(false);
            if !valid {
                errors.push(ValidationError::InvalidAddress {
                    check: name.to_string(),
                    endpoint: endpoint.to_string(),
                });
            }
        }
    }
}
