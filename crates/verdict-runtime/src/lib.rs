//! Verdict Runtime - Evaluation engine for the Verdict policy gate engine
//!
//! Evaluation is pure and synchronous: a caller hands over one
//! [`verdict_core::EvaluationContext`] and one immutable rule-set snapshot and
//! gets back a [`FinalDecision`]. Everything that performs I/O (audit sinks,
//! event publishers, rule-set reloads) lives next to the evaluators but is
//! only ever called before or after an evaluation.

pub mod audit;
pub mod engine;
pub mod error;
pub mod events;
pub mod result;
pub mod snapshot;

// Re-export main types
pub use audit::{
    apply_override, effective_action, AuditEntry, AuditRecord, AuditSink, CausalRef,
    JsonlAuditSink, MemoryAuditSink, OverrideRequest,
};
pub use engine::{
    ConditionEvaluator, DecisionAggregator, DomainEvaluator, ExecutionMode, GateEvaluator,
    PolicyEvaluator, RuleEvaluator, RuleVerdict,
};
pub use error::{Result, RuntimeError};
pub use events::{BroadcastPublisher, DecisionEvent, EventPublisher, NoopPublisher};
pub use result::{
    CheckTrace, ConditionOutcome, ConditionTrace, Diagnostic, DiagnosticKind, DomainResult,
    FinalDecision, GateOutcome, RuleTrace,
};
pub use snapshot::RuleSetStore;
