//! Execution tracing types
//!
//! Traces are part of the decision output, not logging: they are what lets a
//! reviewer see why a rule fired. They are never shown to end users.

use serde::{Deserialize, Serialize};
use verdict_core::{Operator, Value};

/// Three-valued result of one condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionOutcome {
    Matched,
    NotMatched,
    /// The field was absent, null or unusable; never counts as a match
    Unresolved,
}

impl ConditionOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ConditionOutcome::Matched)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, ConditionOutcome::Unresolved)
    }
}

/// Trace of a single condition evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTrace {
    /// Field path that was looked up
    pub field: String,

    pub operator: Operator,

    /// Comparison value after table resolution
    pub expected: Value,

    /// Value found in the context; absent when the field was missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<Value>,

    pub outcome: ConditionOutcome,
}

impl ConditionTrace {
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        expected: Value,
        actual: Option<Value>,
        outcome: ConditionOutcome,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            expected,
            actual,
            outcome,
        }
    }
}

/// Trace of a single rule evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTrace {
    pub rule_id: String,

    /// Whether every condition matched
    pub matched: bool,

    /// Whether any condition was unresolved
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unresolved: bool,

    /// One entry per condition, in rule order
    pub conditions: Vec<ConditionTrace>,
}

impl RuleTrace {
    pub fn new(rule_id: impl Into<String>) -> Self {
        Self {
            rule_id: rule_id.into(),
            matched: false,
            unresolved: false,
            conditions: Vec::new(),
        }
    }

    /// Add a condition trace
    pub fn add_condition(mut self, condition: ConditionTrace) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Fields whose conditions were unresolved, in rule order
    pub fn missing_fields(&self) -> Vec<&str> {
        self.conditions
            .iter()
            .filter(|c| c.outcome.is_unresolved())
            .map(|c| c.field.as_str())
            .collect()
    }
}

/// Trace of one ordered-gate check
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckTrace {
    pub name: String,
    pub passed: bool,
    pub conditions: Vec<ConditionTrace>,
}
