//! Policy engine
//!
//! Ties a rule-set snapshot, the evaluator, an audit sink and an event
//! publisher together. All I/O happens around evaluation: the snapshot is
//! taken first, then the pure evaluation runs, then the decision is audited
//! and published.

use crate::error::{Result, SdkError};
use crate::types::{DecisionRequest, DecisionResponse};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;
use verdict_core::{Action, EvaluationContext, RuleSet};
use verdict_repository::RuleSetRepository;
use verdict_runtime::{
    apply_override, effective_action, AuditRecord, AuditSink, BroadcastPublisher, DecisionEvent,
    EventPublisher, FinalDecision, GateOutcome, OverrideRequest, PolicyEvaluator, RuleSetStore,
    RuntimeError,
};

/// Deterministic policy gate engine
pub struct PolicyEngine {
    store: RuleSetStore,
    evaluator: PolicyEvaluator,
    audit: Arc<dyn AuditSink>,
    events: Arc<dyn EventPublisher>,
    broadcast: Option<BroadcastPublisher>,
    repository: Option<(Arc<dyn RuleSetRepository>, String)>,
}

impl PolicyEngine {
    pub(crate) fn new(
        rule_set: RuleSet,
        evaluator: PolicyEvaluator,
        audit: Arc<dyn AuditSink>,
        events: Arc<dyn EventPublisher>,
        broadcast: Option<BroadcastPublisher>,
        repository: Option<(Arc<dyn RuleSetRepository>, String)>,
    ) -> Self {
        Self {
            store: RuleSetStore::new(rule_set),
            evaluator,
            audit,
            events,
            broadcast,
            repository,
        }
    }

    /// Current rule-set snapshot
    pub fn rule_set(&self) -> Arc<RuleSet> {
        self.store.current()
    }

    pub fn rule_version(&self) -> String {
        self.store.version()
    }

    /// Subscribe to decision events, when the engine broadcasts them
    pub fn subscribe(&self) -> Option<broadcast::Receiver<DecisionEvent>> {
        self.broadcast.as_ref().map(BroadcastPublisher::subscribe)
    }

    /// Evaluate, audit and publish one decision
    ///
    /// Caller mistakes (unknown domain, stale pinned version) are returned
    /// as errors. Engine faults (an evaluator panic, a failed audit write)
    /// fail closed: the response carries the generic "decision unavailable"
    /// block and `audited` is false when the record could not be written.
    pub async fn decide(&self, request: DecisionRequest) -> Result<DecisionResponse> {
        let snapshot = match &request.pinned_version {
            Some(version) => self.store.pinned(version)?,
            None => self.store.current(),
        };

        let evaluated = if request.domains.is_empty() {
            self.evaluator.evaluate_all(&snapshot, &request.context)
        } else {
            let domains: Vec<&str> = request.domains.iter().map(String::as_str).collect();
            self.evaluator.evaluate(&snapshot, &request.context, &domains)
        };

        let decision = fail_closed_on_panic(evaluated, &request, snapshot.version())?;

        let causal = request.causal();
        let record = AuditRecord::decision(causal.clone(), decision.clone());
        let decision_id = record.decision_id;

        if let Err(e) = self.audit.append(record).await {
            tracing::error!(
                "Failed to audit decision {} for request {}: {}; failing closed",
                decision_id,
                request.request_id,
                e
            );
            return Ok(DecisionResponse {
                decision_id,
                decision: FinalDecision::unavailable(
                    decision.input_hash(),
                    decision.rule_version(),
                ),
                audited: false,
            });
        }

        let event = DecisionEvent::from_decision(decision_id, &causal, &decision);
        if let Err(e) = self.events.publish(event).await {
            tracing::warn!("Failed to publish event for decision {}: {}", decision_id, e);
        }

        Ok(DecisionResponse {
            decision_id,
            decision,
            audited: true,
        })
    }

    /// Evaluate one ordered gate against a context
    ///
    /// Gate outcomes are not audited on their own; route the gate through
    /// [`decide`](Self::decide) by naming its id as a domain when an audited
    /// decision is needed.
    pub fn gate(&self, gate_id: &str, context: &EvaluationContext) -> Result<GateOutcome> {
        let snapshot = self.store.current();
        Ok(self.evaluator.evaluate_gate(&snapshot, context, gate_id)?)
    }

    /// Change the action of an audited decision
    pub async fn override_decision(&self, request: OverrideRequest) -> Result<AuditRecord> {
        Ok(apply_override(self.audit.as_ref(), request).await?)
    }

    /// Action of a decision after every override, `None` when unknown
    pub async fn effective_action(&self, decision_id: Uuid) -> Result<Option<Action>> {
        let records = self.audit.records_for(decision_id).await?;
        Ok(effective_action(&records))
    }

    /// Full audit trail of one decision
    pub async fn audit_trail(&self, decision_id: Uuid) -> Result<Vec<AuditRecord>> {
        Ok(self.audit.records_for(decision_id).await?)
    }

    /// Reload the rule set from the repository, returning the new version
    pub async fn reload(&self) -> Result<String> {
        let (repository, id) = self.repository.as_ref().ok_or(SdkError::NoRepository)?;
        let (rule_set, _) = repository.load(id).await?;
        Ok(self.replace_rule_set(rule_set))
    }

    /// Swap in a new rule set, returning its version
    ///
    /// Evaluations already running keep the snapshot they started with.
    pub fn replace_rule_set(&self, rule_set: RuleSet) -> String {
        let version = rule_set.version().to_string();
        self.store.swap(rule_set);
        version
    }
}

/// Replace the outcome of a panicked evaluation with the generic block
///
/// Every other evaluation error is a caller mistake and is returned as is.
fn fail_closed_on_panic(
    evaluated: std::result::Result<FinalDecision, RuntimeError>,
    request: &DecisionRequest,
    rule_version: &str,
) -> Result<FinalDecision> {
    match evaluated {
        Ok(decision) => Ok(decision),
        Err(RuntimeError::EvaluatorPanicked(domain)) => {
            tracing::error!(
                "Evaluator for domain '{}' panicked; failing closed for request {}",
                domain,
                request.request_id
            );
            let input_hash = request.context.input_hash().unwrap_or_default();
            Ok(FinalDecision::unavailable(input_hash, rule_version))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> DecisionRequest {
        DecisionRequest::new(EvaluationContext::new().with("flag", true))
    }

    #[test]
    fn test_panicked_evaluation_fails_closed() {
        let request = request();
        let decision = fail_closed_on_panic(
            Err(RuntimeError::EvaluatorPanicked("financial".to_string())),
            &request,
            "v1",
        )
        .unwrap();

        assert!(decision.is_unavailable());
        assert_eq!(decision.final_action(), Action::Block);
        assert_eq!(decision.rule_version(), "v1");
        assert_eq!(decision.input_hash(), request.context.input_hash().unwrap());
    }

    #[test]
    fn test_caller_errors_are_returned() {
        let err = fail_closed_on_panic(
            Err(RuntimeError::UnknownDomain("nope".to_string())),
            &request(),
            "v1",
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::RuntimeError(RuntimeError::UnknownDomain(_))));
    }
}
