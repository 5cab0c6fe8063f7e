//! Ordered gate parser
//!
//! A gate without an id is a document error. Problems inside a single check
//! do not reject the gate: the check is kept at its position and marked as
//! faulted, so the gate fails closed when evaluation reaches it.

use crate::error::{ParseError, Result};
use crate::rule_parser::RuleParser;
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use verdict_core::{GateCheck, OrderedGate};

/// Ordered gate parser
pub struct GateParser;

impl GateParser {
    /// Parse a gate from YAML value
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<OrderedGate> {
        let id = YamlParser::get_string(yaml, "id")?;
        let mut gate = OrderedGate::new(&id);
        if let Some(domain) = YamlParser::get_optional_string(yaml, "domain") {
            gate = gate.with_domain(domain);
        }

        let checks = YamlParser::get_optional_array(yaml, "checks").ok_or_else(|| {
            ParseError::MissingField {
                field: format!("gates.{}.checks", id),
            }
        })?;

        for (index, check) in checks.iter().enumerate() {
            gate = gate.check(Self::parse_check(check, index));
        }

        Ok(gate)
    }

    /// Parse one check; never fails, malformed checks come back faulted
    pub fn parse_check(yaml: &YamlValue, index: usize) -> GateCheck {
        let name = YamlParser::get_optional_string(yaml, "name")
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("checks[{}]", index));
        let mut check = GateCheck::new(name);

        if let Some(code) = YamlParser::get_optional_string(yaml, "code") {
            check = check.with_code(code);
        }
        if let Some(message) = YamlParser::get_optional_string(yaml, "message") {
            check = check.with_message(message);
        }
        if let Some(alternatives) = YamlParser::get_optional_string(yaml, "alternatives") {
            check = check.with_alternatives(alternatives);
        }

        if YamlParser::get_optional_string(yaml, "name").is_none() {
            return check.with_fault("missing required field 'name'");
        }

        let conditions = match YamlParser::get_optional_array(yaml, "conditions") {
            Some(conditions) => conditions,
            None => return check.with_fault("check has no pass conditions"),
        };

        for (index, cond) in conditions.iter().enumerate() {
            match RuleParser::parse_condition(cond) {
                Ok(condition) => check = check.require(condition),
                Err(err) => {
                    return check.with_fault(format!("condition {}: {}", index, err.reason()));
                }
            }
        }

        check
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> YamlValue {
        YamlParser::parse(s).unwrap()
    }

    #[test]
    fn test_parse_gate_preserves_check_order() {
        let gate = GateParser::parse_from_yaml(&yaml(
            r#"
id: monetization_readiness
domain: monetization
checks:
  - name: explicit_refusal
    message: "Not now."
    conditions: [ { field: explicit_refusal, op: neq, value: true } ]
  - name: readiness_threshold
    code: READINESS_LOW
    message: "Not yet."
    conditions: [ { field: readiness_score, op: gte, value: 0.6 } ]
"#,
        ))
        .unwrap();

        assert_eq!(gate.domain(), "monetization");
        assert_eq!(gate.checks.len(), 2);
        assert_eq!(gate.checks[0].name, "explicit_refusal");
        assert_eq!(gate.checks[1].explanation_code(), "READINESS_LOW");
        assert!(gate.checks.iter().all(|c| c.fault().is_none()));
    }

    #[test]
    fn test_unknown_operator_faults_only_that_check() {
        let gate = GateParser::parse_from_yaml(&yaml(
            r#"
id: g
checks:
  - name: first
    message: m
    conditions: [ { field: a, op: approximately, value: 1 } ]
  - name: second
    message: m
    conditions: [ { field: b, op: eq, value: 1 } ]
"#,
        ))
        .unwrap();

        assert!(gate.checks[0].fault().unwrap().contains("approximately"));
        assert!(gate.checks[1].fault().is_none());
    }

    #[test]
    fn test_missing_id_is_an_error() {
        let result = GateParser::parse_from_yaml(&yaml("checks: []"));
        assert!(matches!(result, Err(ParseError::MissingField { .. })));
    }
}
