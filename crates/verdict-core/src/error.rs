//! Error types for Verdict Core

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum CoreError {
    /// A rule or gate check failed load-time validation
    #[error("Malformed rule '{rule_id}': {reason}")]
    MalformedRule { rule_id: String, reason: String },

    /// An operator name outside the supported set
    #[error("Unknown operator: {0}")]
    UnknownOperator(String),

    /// Two rules or gates share an identifier
    #[error("Duplicate identifier: {0}")]
    DuplicateId(String),

    /// Invalid rule set definition
    #[error("Invalid rule set: {0}")]
    InvalidRuleSet(String),

    /// Canonical serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
