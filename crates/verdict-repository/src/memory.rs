//! In-memory repository

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use verdict_core::RuleSet;
use verdict_parser::RuleSetParser;

use crate::{error::RepositoryError, traits::RuleSetRepository, RepositoryResult};

/// Repository holding rule-set documents in memory
///
/// Documents are parsed on insert so a broken document is rejected up front,
/// and again on every load so each load returns a fresh rule set.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    documents: RwLock<BTreeMap<String, String>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) every rule set of a YAML document, returning their ids
    pub async fn insert(&self, content: &str) -> RepositoryResult<Vec<String>> {
        let rule_sets = RuleSetParser::parse_all(content)?;
        if rule_sets.is_empty() {
            return Err(RepositoryError::Other(
                "document contains no rule set".to_string(),
            ));
        }

        let mut documents = self.documents.write().await;
        let ids: Vec<String> = rule_sets.iter().map(|r| r.id().to_string()).collect();
        for id in &ids {
            documents.insert(id.clone(), content.to_string());
        }
        Ok(ids)
    }

    /// Remove a rule set, returning whether it was present
    pub async fn remove(&self, id: &str) -> bool {
        self.documents.write().await.remove(id).is_some()
    }
}

#[async_trait]
impl RuleSetRepository for MemoryRepository {
    async fn load(&self, identifier: &str) -> RepositoryResult<(RuleSet, String)> {
        let content = self
            .documents
            .read()
            .await
            .get(identifier)
            .cloned()
            .ok_or_else(|| RepositoryError::IdNotFound {
                id: identifier.to_string(),
            })?;

        let rule_set = RuleSetParser::parse_all(&content)?
            .into_iter()
            .find(|r| r.id() == identifier)
            .ok_or_else(|| RepositoryError::IdNotFound {
                id: identifier.to_string(),
            })?;

        Ok((rule_set, content))
    }

    async fn exists(&self, identifier: &str) -> RepositoryResult<bool> {
        Ok(self.documents.read().await.contains_key(identifier))
    }

    async fn list(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.documents.read().await.keys().cloned().collect())
    }
}
