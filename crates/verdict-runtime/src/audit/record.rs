//! Audit record types

use crate::result::FinalDecision;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verdict_core::Action;

/// Request metadata linking a record to its origin
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalRef {
    pub request_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl CausalRef {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            session_id: None,
            tenant_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }
}

/// What an audit record is about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEntry {
    /// A decision produced by normal evaluation
    Decision { decision: Box<FinalDecision> },

    /// A privileged change of a recorded decision's action
    Override {
        previous_action: Action,
        new_action: Action,
        actor: String,
        reason: String,
    },
}

/// Append-only audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub record_id: Uuid,
    /// Decision this record belongs to
    pub decision_id: Uuid,
    pub causal: CausalRef,
    pub recorded_at: DateTime<Utc>,
    pub entry: AuditEntry,
}

impl AuditRecord {
    /// Record a freshly evaluated decision under a new decision id
    pub fn decision(causal: CausalRef, decision: FinalDecision) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            decision_id: Uuid::new_v4(),
            causal,
            recorded_at: Utc::now(),
            entry: AuditEntry::Decision {
                decision: Box::new(decision),
            },
        }
    }

    /// Record an override of an existing decision
    pub fn override_of(
        decision_id: Uuid,
        causal: CausalRef,
        previous_action: Action,
        new_action: Action,
        actor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            record_id: Uuid::new_v4(),
            decision_id,
            causal,
            recorded_at: Utc::now(),
            entry: AuditEntry::Override {
                previous_action,
                new_action,
                actor: actor.into(),
                reason: reason.into(),
            },
        }
    }

    /// The recorded decision, if this is a decision record
    pub fn decision_entry(&self) -> Option<&FinalDecision> {
        match &self.entry {
            AuditEntry::Decision { decision } => Some(decision),
            AuditEntry::Override { .. } => None,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self.entry, AuditEntry::Override { .. })
    }
}

/// Action in force after replaying a decision's records in order
///
/// `None` when the records contain no decision.
pub fn effective_action(records: &[AuditRecord]) -> Option<Action> {
    let mut action = None;
    for record in records {
        match &record.entry {
            AuditEntry::Decision { decision } => action = Some(decision.final_action()),
            AuditEntry::Override { new_action, .. } if action.is_some() => {
                action = Some(*new_action)
            }
            AuditEntry::Override { .. } => {}
        }
    }
    action
}
