//! Ordered gate outcome

use super::domain::{Diagnostic, DomainResult};
use super::trace::{CheckTrace, RuleTrace};
use serde::{Deserialize, Serialize};
use verdict_core::Action;

/// Result of an ordered gate
///
/// `checks` holds only the checks that were actually evaluated: everything
/// after `blocking_check` is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOutcome {
    pub gate_id: String,
    pub domain: String,
    pub passed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_check: Option<String>,

    /// Position of the blocking check in the gate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocking_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<String>,

    pub checks: Vec<CheckTrace>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl GateOutcome {
    /// Action of the gate: `block` on failure, `allow` otherwise
    pub fn action(&self) -> Action {
        if self.passed {
            Action::Allow
        } else {
            Action::Block
        }
    }

    /// Names of the evaluated checks, in order
    pub fn evaluated_checks(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name.as_str()).collect()
    }

    /// View the gate as a domain with one `block` rule per check
    ///
    /// The failing check becomes the triggered rule `gate_id.check`, with its
    /// position as priority, so the outcome can join a multi-domain
    /// aggregation.
    pub fn into_domain_result(self) -> DomainResult {
        let mut result = DomainResult::allow(&self.domain);
        result.traces = self
            .checks
            .iter()
            .map(|check| RuleTrace {
                rule_id: format!("{}.{}", self.gate_id, check.name),
                matched: !check.passed,
                unresolved: check.conditions.iter().any(|c| c.outcome.is_unresolved()),
                conditions: check.conditions.clone(),
            })
            .collect();
        result.diagnostics = self.diagnostics;

        if let Some(check) = self.blocking_check {
            let rule_id = format!("{}.{}", self.gate_id, check);
            result.action = Action::Block;
            result.triggered_rules = vec![rule_id.clone()];
            result.winning_rule = Some(rule_id);
            result.winning_priority = self
                .blocking_index
                .and_then(|i| i32::try_from(i).ok());
            result.explanation_code = self.explanation_code;
            result.message = self.message;
            result.alternatives = self.alternatives;
        }
        result
    }
}
