//! Configuration types for PolicyEngine

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use verdict_runtime::ExecutionMode;

fn default_event_buffer() -> usize {
    256
}

/// Main engine configuration
///
/// Every field has a default, so an empty config file (or none at all)
/// yields a usable in-memory engine once a rule set is supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory of rule-set YAML files
    pub repository_path: Option<PathBuf>,

    /// Id of the rule set to load from the repository
    pub rule_set_id: Option<String>,

    /// Sequential or parallel domain evaluation
    pub execution_mode: ExecutionMode,

    /// JSONL audit log; audit records stay in memory when unset
    pub audit_log: Option<PathBuf>,

    /// Broadcast a redacted event for every audited decision
    pub publish_events: bool,

    /// Capacity of the event broadcast channel
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            repository_path: None,
            rule_set_id: None,
            execution_mode: ExecutionMode::Sequential,
            audit_log: None,
            publish_events: false,
            event_buffer: default_event_buffer(),
        }
    }

    /// Load configuration from environment variables and config file
    ///
    /// Reads `.env` if present, then `config/verdict.{toml,yaml,json}` and
    /// `VERDICT_*` environment variables (which win).
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_result = config::Config::builder()
            .add_source(config::File::with_name("config/verdict").required(false))
            .add_source(config::Environment::with_prefix("VERDICT"))
            .build();

        match config_result {
            Ok(cfg) => Ok(cfg.try_deserialize()?),
            Err(_) => {
                tracing::info!("No config file found, using default configuration");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from one file, ignoring the environment
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .build()?;
        Ok(cfg.try_deserialize()?)
    }

    pub fn with_repository_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.repository_path = Some(path.into());
        self
    }

    pub fn with_rule_set_id(mut self, id: impl Into<String>) -> Self {
        self.rule_set_id = Some(id.into());
        self
    }

    pub fn with_execution_mode(mut self, mode: ExecutionMode) -> Self {
        self.execution_mode = mode;
        self
    }

    pub fn with_audit_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.audit_log = Some(path.into());
        self
    }

    /// Enable event publishing with the given channel capacity
    pub fn publish_events(mut self, buffer: usize) -> Self {
        self.publish_events = true;
        self.event_buffer = buffer;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}
