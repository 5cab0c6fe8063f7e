//! Ordered gate definitions
//!
//! An ordered gate is a list of named checks evaluated in the configured
//! order until the first one fails. Each check lists the conditions that
//! must all hold for it to pass. A failing check blocks; later checks are
//! never evaluated.

use super::{Action, Condition};
use crate::types::{Schema, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named check of an ordered gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateCheck {
    /// Check name, reported as `blocking_check` when it fails
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// User-facing message when this check blocks
    #[serde(default)]
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<String>,

    /// Pass conditions (all must hold)
    #[serde(default)]
    pub conditions: Vec<Condition>,

    /// Load-time fault; a faulted check always fails
    #[serde(skip)]
    fault: Option<String>,
}

impl GateCheck {
    pub fn new(name: impl Into<String>) -> Self {
        GateCheck {
            name: name.into(),
            code: None,
            message: String::new(),
            alternatives: None,
            conditions: Vec::new(),
            fault: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_alternatives(mut self, alternatives: impl Into<String>) -> Self {
        self.alternatives = Some(alternatives.into());
        self
    }

    /// Add a pass condition
    pub fn require(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn explanation_code(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.name)
    }

    /// Mark the check as malformed; it will fail whenever evaluated
    pub fn with_fault(mut self, reason: impl Into<String>) -> Self {
        self.fault = Some(reason.into());
        self
    }

    /// Load-time fault, if the check is malformed
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }
}

/// Short-circuit gate: first failing check wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderedGate {
    pub id: String,

    /// Domain tag used when the gate outcome joins an aggregation; defaults to the id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    pub checks: Vec<GateCheck>,
}

impl OrderedGate {
    pub fn new(id: impl Into<String>) -> Self {
        OrderedGate {
            id: id.into(),
            domain: None,
            checks: Vec::new(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Append a check; order of calls is evaluation order
    pub fn check(mut self, check: GateCheck) -> Self {
        self.checks.push(check);
        self
    }

    pub fn domain(&self) -> &str {
        self.domain.as_deref().unwrap_or(&self.id)
    }

    /// Action of a failing check
    pub fn failure_action(&self) -> Action {
        Action::Block
    }

    /// Compile every check, marking malformed ones as faulted
    ///
    /// Returns `(check name, reason)` for each faulted check. Faulted checks
    /// stay in place so that the gate fails closed at their position.
    pub(crate) fn compile(
        &mut self,
        tables: &BTreeMap<String, Vec<Value>>,
        schema: Option<&Schema>,
    ) -> Vec<(String, String)> {
        let mut faults = Vec::new();
        for check in &mut self.checks {
            let result = if let Some(reason) = &check.fault {
                Err(reason.clone())
            } else if check.name.trim().is_empty() {
                Err("check name cannot be empty".to_string())
            } else if check.message.trim().is_empty() {
                Err("check requires a message".to_string())
            } else if check.conditions.is_empty() {
                Err("check has no pass conditions".to_string())
            } else {
                check
                    .conditions
                    .iter_mut()
                    .enumerate()
                    .try_for_each(|(index, condition)| {
                        condition
                            .compile(tables, schema)
                            .map_err(|reason| format!("condition {}: {}", index, reason))
                    })
            };

            if let Err(reason) = result {
                check.fault = Some(reason.clone());
                faults.push((check.name.clone(), reason));
            }
        }
        faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;

    #[test]
    fn test_gate_builder_preserves_order() {
        let gate = OrderedGate::new("monetization")
            .check(GateCheck::new("explicit_refusal").with_message("a"))
            .check(GateCheck::new("readiness").with_message("b"));

        let names: Vec<&str> = gate.checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["explicit_refusal", "readiness"]);
        assert_eq!(gate.domain(), "monetization");
    }

    #[test]
    fn test_compile_marks_faulted_checks() {
        let mut gate = OrderedGate::new("g")
            .check(
                GateCheck::new("ok")
                    .with_message("m")
                    .require(Condition::new("x", Operator::Gte, 0.5)),
            )
            .check(
                GateCheck::new("bad")
                    .with_message("m")
                    .require(Condition::new("x", Operator::Gte, "high")),
            )
            .check(GateCheck::new("empty").with_message("m"));

        let faults = gate.compile(&BTreeMap::new(), None);

        assert_eq!(faults.len(), 2);
        assert!(gate.checks[0].fault().is_none());
        assert!(gate.checks[1].fault().is_some());
        assert!(gate.checks[2].fault().unwrap().contains("no pass conditions"));
    }
}
