//! Rule parser
//!
//! Parses individual YAML rule definitions. A rule that cannot be built is
//! returned as a [`RuleFault`] rather than an error so that the rule set it
//! belongs to still loads; the evaluators report it as skipped.

use crate::error::ParseError;
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use std::str::FromStr;
use verdict_core::{Action, Condition, Operator, Rule, RuleFault, Severity, Value};

/// Why a single condition could not be parsed
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionError {
    /// The `op` string names no known operator
    UnknownOperator(String),
    /// Anything else: missing field, wrong type
    Malformed(String),
}

impl ConditionError {
    pub fn reason(&self) -> String {
        match self {
            ConditionError::UnknownOperator(op) => format!("unknown operator '{}'", op),
            ConditionError::Malformed(reason) => reason.clone(),
        }
    }
}

/// Rule parser
pub struct RuleParser;

impl RuleParser {
    /// Parse one rule; `index` names the rule in faults when it has no id
    pub fn parse(yaml: &YamlValue, index: usize) -> std::result::Result<Rule, RuleFault> {
        let domain = YamlParser::get_optional_string(yaml, "domain");
        let id = YamlParser::get_optional_string(yaml, "id").filter(|id| !id.trim().is_empty());
        let id = match id {
            Some(id) => id,
            None => {
                return Err(RuleFault::malformed(
                    format!("rules[{}]", index),
                    domain,
                    "missing required field 'id'",
                ))
            }
        };

        Self::parse_rule(yaml, &id).map_err(|err| match err {
            RuleError::UnknownOperator(op) => RuleFault::unknown_operator(&id, domain.clone(), &op),
            RuleError::Malformed(reason) => RuleFault::malformed(&id, domain.clone(), reason),
        })
    }

    /// Parse every rule of a sequence, splitting valid rules from faults
    pub fn parse_all(rules: &[YamlValue]) -> (Vec<Rule>, Vec<RuleFault>) {
        let mut parsed = Vec::with_capacity(rules.len());
        let mut faults = Vec::new();
        for (index, yaml) in rules.iter().enumerate() {
            match Self::parse(yaml, index) {
                Ok(rule) => parsed.push(rule),
                Err(fault) => {
                    tracing::warn!("Skipping rule '{}': {}", fault.rule_id, fault.reason);
                    faults.push(fault);
                }
            }
        }
        (parsed, faults)
    }

    fn parse_rule(yaml: &YamlValue, id: &str) -> std::result::Result<Rule, RuleError> {
        let domain = YamlParser::get_string(yaml, "domain").map_err(RuleError::from)?;
        let action = Self::parse_action(yaml)?;

        let mut rule = Rule::new(id, domain, action);

        if let Some(priority) = YamlParser::get_optional_i32(yaml, "priority")? {
            rule.priority = priority;
        }
        if let Some(severity) = YamlParser::get_optional_string(yaml, "severity") {
            rule.severity = Self::parse_severity(&severity)?;
        }
        if let Some(confidence) = YamlParser::get_optional_f64(yaml, "confidence")? {
            rule.confidence = confidence;
        }
        if let Some(active) = YamlParser::get_optional_bool(yaml, "active")? {
            rule.active = active;
        }
        if let Some(version) = YamlParser::get_optional_scalar(yaml, "version") {
            rule.version = version;
        }
        rule.code = YamlParser::get_optional_string(yaml, "code");
        rule.message = YamlParser::get_optional_string(yaml, "message").unwrap_or_default();
        rule.alternatives = YamlParser::get_optional_string(yaml, "alternatives");

        if let Some(conditions) = YamlParser::get_optional_array(yaml, "conditions") {
            for (index, cond) in conditions.iter().enumerate() {
                let condition = Self::parse_condition(cond).map_err(|err| match err {
                    ConditionError::UnknownOperator(op) => RuleError::UnknownOperator(op),
                    ConditionError::Malformed(reason) => {
                        RuleError::Malformed(format!("condition {}: {}", index, reason))
                    }
                })?;
                rule.conditions.push(condition);
            }
        } else if YamlParser::has_field(yaml, "conditions") {
            return Err(RuleError::Malformed("conditions must be a list".to_string()));
        }

        Ok(rule)
    }

    /// Parse a condition mapping: `{ field, op, value | table, case_sensitive }`
    pub fn parse_condition(yaml: &YamlValue) -> std::result::Result<Condition, ConditionError> {
        let field = YamlParser::get_string(yaml, "field")
            .map_err(|e| ConditionError::Malformed(e.to_string()))?;
        let op_str = YamlParser::get_string(yaml, "op")
            .map_err(|e| ConditionError::Malformed(e.to_string()))?;
        let op = Operator::from_str(&op_str)
            .map_err(|_| ConditionError::UnknownOperator(op_str.clone()))?;

        let mut condition = match YamlParser::get_optional_string(yaml, "table") {
            Some(table) => Condition::with_table(field, op, table),
            None => {
                let value = match yaml.get("value") {
                    Some(v) => YamlParser::to_value(v)
                        .map_err(|e| ConditionError::Malformed(e.to_string()))?,
                    None => Value::Null,
                };
                Condition::new(field, op, value)
            }
        };

        let case_sensitive = YamlParser::get_optional_bool(yaml, "case_sensitive")
            .map_err(|e| ConditionError::Malformed(e.to_string()))?;
        if case_sensitive == Some(false) {
            condition = condition.case_insensitive();
        }

        Ok(condition)
    }

    fn parse_action(yaml: &YamlValue) -> std::result::Result<Action, RuleError> {
        let action_str = YamlParser::get_string(yaml, "action")?;
        Action::from_str(&action_str).map_err(RuleError::Malformed)
    }

    fn parse_severity(severity: &str) -> std::result::Result<Severity, RuleError> {
        match severity {
            "hard" => Ok(Severity::Hard),
            "soft" => Ok(Severity::Soft),
            other => Err(RuleError::Malformed(format!("unknown severity '{}'", other))),
        }
    }
}

enum RuleError {
    UnknownOperator(String),
    Malformed(String),
}

impl From<ParseError> for RuleError {
    fn from(err: ParseError) -> Self {
        RuleError::Malformed(err.to_string())
    }
}
