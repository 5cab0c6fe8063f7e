//! Builder pattern for PolicyEngine

use crate::config::EngineConfig;
use crate::engine::PolicyEngine;
use crate::error::{Result, SdkError};
use std::path::PathBuf;
use std::sync::Arc;
use verdict_core::RuleSet;
use verdict_parser::RuleSetParser;
use verdict_repository::{FileSystemRepository, RuleSetRepository};
use verdict_runtime::{
    AuditSink, BroadcastPublisher, EventPublisher, ExecutionMode, JsonlAuditSink,
    MemoryAuditSink, NoopPublisher, PolicyEvaluator,
};

/// Builder for PolicyEngine
///
/// # Example
///
/// ```rust,ignore
/// use verdict_sdk::{EngineConfig, PolicyEngineBuilder};
///
/// // From a rule-set repository on disk
/// let engine = PolicyEngineBuilder::new()
///     .with_config(EngineConfig::load()?)
///     .build()
///     .await?;
///
/// // Inline YAML (tests, embedding)
/// let engine = PolicyEngineBuilder::new()
///     .with_rule_set_content(yaml)
///     .build()
///     .await?;
/// ```
pub struct PolicyEngineBuilder {
    config: EngineConfig,
    rule_set: Option<RuleSet>,
    rule_set_content: Option<String>,
    repository: Option<Arc<dyn RuleSetRepository>>,
    audit: Option<Arc<dyn AuditSink>>,
    events: Option<Arc<dyn EventPublisher>>,
}

impl PolicyEngineBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            config: EngineConfig::new(),
            rule_set: None,
            rule_set_content: None,
            repository: None,
            audit: None,
            events: None,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Use an already built rule set
    pub fn with_rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_set = Some(rule_set);
        self
    }

    /// Parse the rule set from YAML content
    pub fn with_rule_set_content(mut self, content: impl Into<String>) -> Self {
        self.rule_set_content = Some(content.into());
        self
    }

    /// Load (and reload) the rule set from a repository
    pub fn with_repository(
        mut self,
        repository: Arc<dyn RuleSetRepository>,
        rule_set_id: impl Into<String>,
    ) -> Self {
        self.repository = Some(repository);
        self.config.rule_set_id = Some(rule_set_id.into());
        self
    }

    /// Load the rule set from a directory of YAML files
    pub fn with_repository_path(
        mut self,
        path: impl Into<PathBuf>,
        rule_set_id: impl Into<String>,
    ) -> Self {
        self.config.repository_path = Some(path.into());
        self.config.rule_set_id = Some(rule_set_id.into());
        self
    }

    pub fn execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.config.execution_mode = mode;
        self
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    /// Append audit records to a JSONL file
    pub fn with_audit_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.audit_log = Some(path.into());
        self
    }

    pub fn with_event_publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.events = Some(publisher);
        self
    }

    /// Broadcast decision events in process
    pub fn publish_events(mut self, buffer: usize) -> Self {
        self.config = self.config.publish_events(buffer);
        self
    }

    /// Build the engine
    pub async fn build(self) -> Result<PolicyEngine> {
        let PolicyEngineBuilder {
            config,
            rule_set,
            rule_set_content,
            repository,
            audit,
            events,
        } = self;

        let repository: Option<Arc<dyn RuleSetRepository>> =
            match (repository, &config.repository_path) {
                (Some(repo), _) => Some(repo),
                (None, Some(path)) => Some(Arc::new(FileSystemRepository::new(path)?)),
                (None, None) => None,
            };
        let reload_source = match (&repository, &config.rule_set_id) {
            (Some(repo), Some(id)) => Some((Arc::clone(repo), id.clone())),
            _ => None,
        };

        let rule_set = match (rule_set, rule_set_content, &reload_source) {
            (Some(rule_set), _, _) => rule_set,
            (None, Some(content), _) => RuleSetParser::parse(&content)?,
            (None, None, Some((repo, id))) => repo.load(id).await?.0,
            (None, None, None) => return Err(SdkError::NoRuleSet),
        };

        let audit: Arc<dyn AuditSink> = match (audit, &config.audit_log) {
            (Some(sink), _) => sink,
            (None, Some(path)) => Arc::new(JsonlAuditSink::new(path)),
            (None, None) => Arc::new(MemoryAuditSink::new()),
        };

        let (events, broadcast): (Arc<dyn EventPublisher>, _) = match events {
            Some(publisher) => (publisher, None),
            None if config.publish_events => {
                let publisher = BroadcastPublisher::new(config.event_buffer);
                (Arc::new(publisher.clone()), Some(publisher))
            }
            None => (Arc::new(NoopPublisher), None),
        };

        tracing::info!(
            "Policy engine ready: rule set '{}' version {} ({:?} evaluation, {} faults)",
            rule_set.id(),
            rule_set.version(),
            config.execution_mode,
            rule_set.faults().len()
        );

        Ok(PolicyEngine::new(
            rule_set,
            PolicyEvaluator::new(config.execution_mode),
            audit,
            events,
            broadcast,
            reload_source,
        ))
    }
}

impl Default for PolicyEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
