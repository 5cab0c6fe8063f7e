//! Common test utilities for SDK integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use uuid::Uuid;
use verdict_runtime::{AuditRecord, AuditSink, Result as RuntimeResult, RuntimeError};
use verdict_sdk::{
    DecisionRequest, DecisionResponse, EvaluationContext, PolicyEngine, PolicyEngineBuilder,
};

/// Two domains: `x` restricts, `y` blocks, each behind its own flag
pub const TWO_DOMAINS: &str = r#"
ruleset:
  id: two_domains
  version: "1"
  rules:
    - id: x_restrict
      domain: x
      action: restrict
      priority: 10
      code: X_LIMITED
      message: "Limited by X."
      conditions:
        - { field: flag_x, op: eq, value: true }
    - id: y_block
      domain: y
      action: block
      priority: 20
      code: Y_BLOCKED
      message: "Blocked by Y."
      alternatives: "Try Z."
      conditions:
        - { field: flag_y, op: eq, value: true }
"#;

/// Test helper to create a PolicyEngine from inline YAML
pub struct TestEngine {
    content: String,
    builder: PolicyEngineBuilder,
}

impl TestEngine {
    pub fn new(rule_set_yaml: &str) -> Self {
        Self {
            content: rule_set_yaml.trim().to_string(),
            builder: PolicyEngineBuilder::new(),
        }
    }

    /// Adjust the builder before the engine is built
    pub fn configure(mut self, f: impl FnOnce(PolicyEngineBuilder) -> PolicyEngineBuilder) -> Self {
        self.builder = f(self.builder);
        self
    }

    pub async fn build(self) -> PolicyEngine {
        self.builder
            .with_rule_set_content(self.content)
            .build()
            .await
            .expect("Failed to build engine")
    }

    /// Build and run one decision over `fields`
    pub async fn decide(self, fields: &[(&str, bool)]) -> DecisionResponse {
        let engine = self.build().await;
        engine
            .decide(request(fields))
            .await
            .expect("Decision failed")
    }
}

pub fn request(fields: &[(&str, bool)]) -> DecisionRequest {
    let context: EvaluationContext = fields
        .iter()
        .map(|(field, value)| (field.to_string(), verdict_sdk::Value::from(*value)))
        .collect();
    DecisionRequest::new(context)
        .with_session("session-1")
        .with_tenant("tenant-1")
}

/// Audit sink whose writes always fail
pub struct FailingAuditSink;

#[async_trait]
impl AuditSink for FailingAuditSink {
    async fn append(&self, _record: AuditRecord) -> RuntimeResult<()> {
        Err(RuntimeError::Audit("disk full".to_string()))
    }

    async fn append_after(&self, _record: AuditRecord, _seen: usize) -> RuntimeResult<bool> {
        Err(RuntimeError::Audit("disk full".to_string()))
    }

    async fn records_for(&self, _decision_id: Uuid) -> RuntimeResult<Vec<AuditRecord>> {
        Ok(Vec::new())
    }
}
