//! Repository trait

use async_trait::async_trait;
use verdict_core::RuleSet;

use crate::RepositoryResult;

/// Source of versioned rule sets
///
/// Identifiers are rule-set ids; implementations may also accept
/// storage-specific forms such as relative file paths. A load always returns
/// the whole rule set together with the raw document it was parsed from.
///
/// All implementations must be `Send + Sync` for use across async tasks.
#[async_trait]
pub trait RuleSetRepository: Send + Sync {
    /// Load a rule set by id (or path)
    async fn load(&self, identifier: &str) -> RepositoryResult<(RuleSet, String)>;

    /// Check if a rule set exists
    async fn exists(&self, identifier: &str) -> RepositoryResult<bool>;

    /// Ids of every rule set the repository can load, sorted
    async fn list(&self) -> RepositoryResult<Vec<String>>;
}
