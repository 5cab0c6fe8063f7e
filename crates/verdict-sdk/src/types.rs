//! Request and response types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verdict_core::{Action, EvaluationContext, Value};
use verdict_runtime::{CausalRef, FinalDecision};

/// One decision request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub context: EvaluationContext,

    /// Domains (or gate ids) to evaluate; empty means every rule domain
    #[serde(default)]
    pub domains: Vec<String>,

    pub request_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    /// Reject the request unless the active rule set has this version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned_version: Option<String>,
}

impl DecisionRequest {
    /// Create a request with a generated request id
    pub fn new(context: EvaluationContext) -> Self {
        Self {
            context,
            domains: Vec::new(),
            request_id: Uuid::new_v4().to_string(),
            session_id: None,
            tenant_id: None,
            pinned_version: None,
        }
    }

    /// Add a context field
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context.insert(field, value);
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domains.push(domain.into());
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    pub fn pinned_to(mut self, version: impl Into<String>) -> Self {
        self.pinned_version = Some(version.into());
        self
    }

    pub(crate) fn causal(&self) -> CausalRef {
        CausalRef {
            request_id: self.request_id.clone(),
            session_id: self.session_id.clone(),
            tenant_id: self.tenant_id.clone(),
        }
    }
}

/// What the end user gets to see: action, message and alternatives only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserResponse {
    pub action: Action,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<String>,
}

impl From<&FinalDecision> for UserResponse {
    fn from(decision: &FinalDecision) -> Self {
        Self {
            action: decision.final_action(),
            message: decision.user_message().map(str::to_string),
            alternatives: decision.alternatives().map(str::to_string),
        }
    }
}

/// Result of [`PolicyEngine::decide`](crate::PolicyEngine::decide)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    /// Id of the audit trail of this decision, used for overrides
    pub decision_id: Uuid,

    pub decision: FinalDecision,

    /// False when the decision could not be persisted and was replaced by
    /// the generic fail-closed block
    pub audited: bool,
}

impl DecisionResponse {
    pub fn final_action(&self) -> Action {
        self.decision.final_action()
    }

    /// User-facing view without rule ids or traces
    pub fn user_response(&self) -> UserResponse {
        UserResponse::from(&self.decision)
    }
}
