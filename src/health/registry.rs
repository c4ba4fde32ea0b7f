//! Named check registry.
//!
//! # Responsibilities
//! - Hold every registered health source under a unique name
//! - Answer the aggregate "which checks are failing" query
//!
//! # Design Decisions
//! - Populated once at startup, read concurrently afterwards
//! - Duplicate names are a configuration error, never an overwrite
//! - No global instance: the registry is constructed and passed explicitly

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::health::outcome::{HealthSource, Outcome};

/// Error type for registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("check already exists: {0}")]
    DuplicateCheck(String),
}

/// Name → failure reason for every check currently failing.
pub type StatusSnapshot = BTreeMap<String, String>;

/// A concurrent-safe collection of named health sources.
#[derive(Default)]
pub struct Registry {
    checks: RwLock<HashMap<String, Arc<dyn HealthSource>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associate a health source with `name`.
    pub fn register(
        &self,
        name: impl Into<String>,
        source: Arc<dyn HealthSource>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut checks = self.checks.write().unwrap_or_else(|e| e.into_inner());
        if checks.contains_key(&name) {
            return Err(RegistryError::DuplicateCheck(name));
        }
        tracing::debug!(check = %name, "Check registered");
        checks.insert(name, source);
        Ok(())
    }

    /// Every currently failing check with its latest failure reason.
    /// Healthy checks are omitted.
    pub fn status_snapshot(&self) -> StatusSnapshot {
        let checks = self.checks.read().unwrap_or_else(|e| e.into_inner());
        checks
            .iter()
            .filter_map(|(name, source)| match source.check() {
                Outcome::Ok => None,
                Outcome::Failed(reason) => Some((name.clone(), reason)),
            })
            .collect()
    }

    /// True when no registered check is failing.
    pub fn is_healthy(&self) -> bool {
        self.status_snapshot().is_empty()
    }

    /// True once every registered source has observed a result.
    pub fn all_reported(&self) -> bool {
        let checks = self.checks.read().unwrap_or_else(|e| e.into_inner());
        checks.values().all(|source| source.has_reported())
    }

    pub fn len(&self) -> usize {
        self.checks.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered check names, sorted.
    pub fn names(&self) -> Vec<String> {
        let checks = self.checks.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = checks.keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("checks", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::smoother::StatusSmoother;

    struct Fixed(Outcome);

    impl HealthSource for Fixed {
        fn check(&self) -> Outcome {
            self.0.clone()
        }
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let registry = Registry::new();
        registry.register("tcp-a", Arc::new(Fixed(Outcome::Ok))).unwrap();
        let err = registry
            .register("tcp-a", Arc::new(Fixed(Outcome::failed("x"))))
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCheck(ref name) if name == "tcp-a"));
        // The original entry is untouched.
        assert!(registry.is_healthy());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_distinct_names_never_collide() {
        let registry = Registry::new();
        for i in 0..20 {
            registry
                .register(format!("check-{}", i), Arc::new(Fixed(Outcome::Ok)))
                .unwrap();
        }
        assert_eq!(registry.len(), 20);
    }

    #[test]
    fn test_snapshot_only_contains_failures() {
        let registry = Registry::new();
        let failing = Arc::new(StatusSmoother::new("tcp-a", 1));
        let passing = Arc::new(StatusSmoother::new("http-b", 1));
        registry.register("tcp-a", failing.clone()).unwrap();
        registry.register("http-b", passing.clone()).unwrap();

        failing.record(Outcome::failed("connection to localhost:1 failed"));
        passing.record(Outcome::Ok);

        let snapshot = registry.status_snapshot();
        let expected: StatusSnapshot = [(
            "tcp-a".to_string(),
            "connection to localhost:1 failed".to_string(),
        )]
        .into_iter()
        .collect();
        assert_eq!(snapshot, expected);
        assert!(!registry.is_healthy());
    }

    #[test]
    fn test_all_reported_waits_for_every_smoother() {
        let registry = Registry::new();
        let a = Arc::new(StatusSmoother::new("a", 1));
        let b = Arc::new(StatusSmoother::new("b", 1));
        registry.register("a", a.clone()).unwrap();
        registry.register("b", b.clone()).unwrap();
        registry.register("fixed", Arc::new(Fixed(Outcome::Ok))).unwrap();
        assert!(!registry.all_reported());

        a.record(Outcome::Ok);
        assert!(!registry.all_reported());
        b.record(Outcome::failed("down"));
        assert!(registry.all_reported());
    }

    #[test]
    fn test_empty_registry_is_healthy() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.status_snapshot().is_empty());
    }

    #[test]
    fn test_concurrent_snapshots() {
        use std::thread;

        let registry = Arc::new(Registry::new());
        let smoother = Arc::new(StatusSmoother::new("a", 1));
        registry.register("a", smoother.clone()).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let snapshot = registry.status_snapshot();
                        if let Some(reason) = snapshot.get("a") {
                            assert_eq!(reason, "down");
                        }
                    }
                })
            })
            .collect();
        for i in 0..500 {
            if i % 2 == 0 {
                smoother.record(Outcome::failed("down"));
            } else {
                smoother.record(Outcome::Ok);
            }
        }
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
