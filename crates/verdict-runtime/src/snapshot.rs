//! Rule-set snapshots
//!
//! The store hands out `Arc<RuleSet>` snapshots. A reload replaces the whole
//! snapshot at once; evaluations already holding the previous `Arc` keep
//! seeing the previous version until they finish.

use crate::error::{Result, RuntimeError};
use std::sync::{Arc, RwLock};
use verdict_core::RuleSet;

/// Holder of the active rule set
#[derive(Debug)]
pub struct RuleSetStore {
    current: RwLock<Arc<RuleSet>>,
}

impl RuleSetStore {
    pub fn new(rule_set: RuleSet) -> Self {
        Self {
            current: RwLock::new(Arc::new(rule_set)),
        }
    }

    /// Current snapshot
    pub fn current(&self) -> Arc<RuleSet> {
        let guard = self.current.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    /// Version of the current snapshot
    pub fn version(&self) -> String {
        self.current().version().to_string()
    }

    /// Current snapshot, provided it still has the version the caller holds
    pub fn pinned(&self, expected_version: &str) -> Result<Arc<RuleSet>> {
        let snapshot = self.current();
        if snapshot.version() != expected_version {
            tracing::warn!(
                "Rejecting evaluation pinned to {}; current rule set is {}",
                expected_version,
                snapshot.version()
            );
            return Err(RuntimeError::RuleSetVersionMismatch {
                expected: expected_version.to_string(),
                actual: snapshot.version().to_string(),
            });
        }
        Ok(snapshot)
    }

    /// Atomically replace the active rule set, returning the previous one
    pub fn swap(&self, rule_set: RuleSet) -> Arc<RuleSet> {
        let next = Arc::new(rule_set);
        let mut guard = self.current.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = std::mem::replace(&mut *guard, Arc::clone(&next));
        tracing::info!(
            "Rule set '{}' reloaded: {} -> {}",
            next.id(),
            previous.version(),
            next.version()
        );
        previous
    }
}
