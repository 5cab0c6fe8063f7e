//! Audited override path
//!
//! The only way to change the action of a recorded decision, in either
//! direction. Normal evaluation never calls into this module.

use super::record::{effective_action, AuditRecord};
use super::sink::AuditSink;
use crate::error::{Result, RuntimeError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use verdict_core::Action;

/// Privileged request to change a decision's action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrideRequest {
    pub decision_id: Uuid,
    pub new_action: Action,
    /// Who is overriding; required
    pub actor: String,
    /// Why; required
    pub reason: String,
}

impl OverrideRequest {
    pub fn new(
        decision_id: Uuid,
        new_action: Action,
        actor: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            decision_id,
            new_action,
            actor: actor.into(),
            reason: reason.into(),
        }
    }
}

/// Apply an override and persist its audit record
///
/// # Errors
///
/// - [`RuntimeError::InvalidOverride`] when actor or reason is blank, or the
///   action would not change
/// - [`RuntimeError::UnknownDecision`] when no decision record exists
/// - [`RuntimeError::OverrideConflict`] when another record for the decision
///   was appended while this one was prepared
/// - any error of the sink; in that case the override has not happened
pub async fn apply_override(
    sink: &dyn AuditSink,
    request: OverrideRequest,
) -> Result<AuditRecord> {
    if request.actor.trim().is_empty() {
        return Err(RuntimeError::InvalidOverride("actor is required".to_string()));
    }
    if request.reason.trim().is_empty() {
        return Err(RuntimeError::InvalidOverride("reason is required".to_string()));
    }

    let history = sink.records_for(request.decision_id).await?;
    let original = history
        .iter()
        .find(|r| r.decision_entry().is_some())
        .ok_or_else(|| RuntimeError::UnknownDecision(request.decision_id.to_string()))?;
    let previous_action = effective_action(&history)
        .ok_or_else(|| RuntimeError::UnknownDecision(request.decision_id.to_string()))?;

    if previous_action == request.new_action {
        return Err(RuntimeError::InvalidOverride(format!(
            "decision is already {}",
            previous_action
        )));
    }

    let actor = request.actor.clone();
    let record = AuditRecord::override_of(
        request.decision_id,
        original.causal.clone(),
        previous_action,
        request.new_action,
        request.actor,
        request.reason,
    );
    if !sink.append_after(record.clone(), history.len()).await? {
        return Err(RuntimeError::OverrideConflict(request.decision_id.to_string()));
    }

    tracing::warn!(
        "Decision {} overridden from {} to {} by {}",
        record.decision_id,
        previous_action,
        request.new_action,
        actor
    );

    Ok(record)
}
