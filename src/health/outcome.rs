//! Probe outcomes and the read side of a health check.

use std::fmt;

use crate::probe::ProbeError;

/// Result of one probe invocation, or the current verdict of a check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    /// Failure with a human-readable reason.
    Failed(String),
}

impl Outcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Outcome::Failed(reason.into())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok)
    }

    /// Failure reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Ok => None,
            Outcome::Failed(reason) => Some(reason),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok => write!(f, "ok"),
            Outcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

impl From<Result<(), ProbeError>> for Outcome {
    fn from(result: Result<(), ProbeError>) -> Self {
        match result {
            Ok(()) => Outcome::Ok,
            Err(e) => Outcome::Failed(e.to_string()),
        }
    }
}

/// Anything that can answer "is this check healthy right now".
///
/// `check` must be cheap and non-blocking: it is called while the registry
/// holds its read lock.
pub trait HealthSource: Send + Sync {
    fn check(&self) -> Outcome;

    /// Whether the source has observed at least one real result. Sources
    /// without a warm-up phase are always considered reported.
    fn has_reported(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_probe_error_becomes_reason() {
        let err = ProbeError::Timeout {
            target: "localhost:11211".to_string(),
            after: Duration::from_secs(1),
        };
        let outcome: Outcome = Err(err).into();
        assert_eq!(outcome.reason(), Some("localhost:11211 timed out after 1s"));
        assert!(Outcome::from(Ok(())).is_ok());
    }
}
