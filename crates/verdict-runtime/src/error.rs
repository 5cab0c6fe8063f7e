//! Runtime error types

use thiserror::Error;
use verdict_core::{Action, CoreError};

/// Runtime error
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Caller pinned a rule-set version that is not the current snapshot
    #[error("Rule set version mismatch: expected {expected}, current is {actual}")]
    RuleSetVersionMismatch { expected: String, actual: String },

    /// Attempt to relax a decision outside the audited override path
    #[error("Cannot relax decision from {from} to {to} without an audited override")]
    OverrideWithoutAudit { from: Action, to: Action },

    /// Override request is missing required data or changes nothing
    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    /// The decision changed while an override was being recorded
    #[error("Decision {0} changed concurrently; re-read it and retry")]
    OverrideConflict(String),

    /// No decision with this id has been audited
    #[error("Unknown decision: {0}")]
    UnknownDecision(String),

    /// Requested domain has no rules in the active rule set
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// Requested gate does not exist in the active rule set
    #[error("Unknown gate: {0}")]
    UnknownGate(String),

    /// Nothing to evaluate
    #[error("No domains requested")]
    NoDomains,

    /// A domain evaluator panicked
    #[error("Evaluator failed for domain '{0}'")]
    EvaluatorPanicked(String),

    /// Audit persistence failure
    #[error("Audit error: {0}")]
    Audit(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Core error
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for runtime operations
pub type Result<T> = std::result::Result<T, RuntimeError>;
