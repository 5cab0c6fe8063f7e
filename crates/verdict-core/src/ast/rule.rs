//! Rule definitions

use super::{Action, Condition};
use crate::types::{Schema, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a rule reacts to missing input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Missing input fails closed: the domain takes its most restrictive action
    Hard,
    /// Missing input means the rule does not match
    #[default]
    Soft,
}

fn default_confidence() -> f64 {
    1.0
}

fn default_active() -> bool {
    true
}

fn default_version() -> String {
    "1".to_string()
}

/// Rule definition
///
/// A rule matches when every one of its conditions matches. Compound logic
/// is expressed as several rules rather than nested groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique rule ID, stable across versions
    pub id: String,

    /// Policy domain the rule belongs to (e.g. "financial", "merge_safety")
    pub domain: String,

    /// Action produced when the rule matches
    pub action: Action,

    /// Lower values are evaluated first and win ties
    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub severity: Severity,

    /// Explanation code surfaced to callers; defaults to the rule id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// User-facing message template, returned verbatim
    #[serde(default)]
    pub message: String,

    /// Optional alternatives template offered alongside the message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<String>,

    /// Confidence reported for the domain when this rule wins
    #[serde(default = "default_confidence")]
    pub confidence: f64,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default = "default_version")]
    pub version: String,

    /// Conjunctive conditions, evaluated in order
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Rule {
    /// Create an active, soft rule with no conditions
    pub fn new(id: impl Into<String>, domain: impl Into<String>, action: Action) -> Self {
        Rule {
            id: id.into(),
            domain: domain.into(),
            action,
            priority: 0,
            severity: Severity::Soft,
            code: None,
            message: String::new(),
            alternatives: None,
            confidence: default_confidence(),
            active: true,
            version: default_version(),
            conditions: Vec::new(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
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

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Add a condition
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Explanation code, falling back to the rule id
    pub fn explanation_code(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.id)
    }

    /// Ordering key used for evaluation order and tie-breaks
    pub fn sort_key(&self) -> (i32, &str) {
        (self.priority, self.id.as_str())
    }

    /// Validate the rule and compile its conditions
    pub(crate) fn compile(
        &mut self,
        tables: &BTreeMap<String, Vec<Value>>,
        schema: Option<&Schema>,
    ) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("rule id cannot be empty".to_string());
        }
        if self.domain.trim().is_empty() {
            return Err("rule domain cannot be empty".to_string());
        }
        if self.action != Action::Allow && self.message.trim().is_empty() {
            return Err(format!("{} rule requires a message", self.action));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(format!("confidence {} outside [0, 1]", self.confidence));
        }
        for (index, condition) in self.conditions.iter_mut().enumerate() {
            condition
                .compile(tables, schema)
                .map_err(|reason| format!("condition {}: {}", index, reason))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;

    #[test]
    fn test_rule_builder() {
        let rule = Rule::new("fin_vulnerable", "financial", Action::Block)
            .with_priority(10)
            .with_severity(Severity::Hard)
            .with_code("FIN_VULNERABLE")
            .with_message("We can't help with this right now.")
            .when(Condition::new("emotional_vulnerability", Operator::Eq, true));

        assert_eq!(rule.priority, 10);
        assert_eq!(rule.explanation_code(), "FIN_VULNERABLE");
        assert_eq!(rule.conditions.len(), 1);
        assert!(rule.active);
    }

    #[test]
    fn test_explanation_code_defaults_to_id() {
        let rule = Rule::new("r1", "d", Action::Allow);
        assert_eq!(rule.explanation_code(), "r1");
    }

    #[test]
    fn test_compile_requires_message_for_restrictive_rules() {
        let mut rule = Rule::new("r1", "d", Action::Restrict);
        let err = rule.compile(&BTreeMap::new(), None).unwrap_err();
        assert!(err.contains("requires a message"));
    }

    #[test]
    fn test_compile_rejects_confidence_out_of_range() {
        let mut rule = Rule::new("r1", "d", Action::Allow).with_confidence(1.5);
        assert!(rule.compile(&BTreeMap::new(), None).is_err());
    }

    #[test]
    fn test_compile_reports_condition_index() {
        let mut rule = Rule::new("r1", "d", Action::Block)
            .with_message("no")
            .when(Condition::new("a", Operator::Eq, 1.0))
            .when(Condition::new("b", Operator::Gt, "x"));
        let err = rule.compile(&BTreeMap::new(), None).unwrap_err();
        assert!(err.starts_with("condition 1"));
    }

    #[test]
    fn test_rule_deserialize_defaults() {
        let yaml = r#"
id: ci_not_green
domain: merge_safety
action: block
message: CI must pass
conditions:
  - field: ci_status
    op: neq
    value: success
"#;
        let rule: Rule = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(rule.priority, 0);
        assert_eq!(rule.severity, Severity::Soft);
        assert!(rule.active);
        assert_eq!(rule.confidence, 1.0);
        assert_eq!(rule.version, "1");
    }
}
