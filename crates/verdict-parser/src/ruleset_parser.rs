//! Rule set parser
//!
//! Parses YAML rule-set documents into validated [`RuleSet`] values.

use crate::error::{ParseError, Result};
use crate::gate_parser::GateParser;
use crate::rule_parser::RuleParser;
use crate::yaml_parser::YamlParser;
use serde_yaml::Value as YamlValue;
use verdict_core::{RuleSet, Schema, Value};

/// Rule set parser
pub struct RuleSetParser;

impl RuleSetParser {
    /// Parse a rule set from YAML string
    pub fn parse(yaml_str: &str) -> Result<RuleSet> {
        let yaml = YamlParser::parse(yaml_str)?;
        Self::parse_from_yaml(&yaml)
    }

    /// Parse every `ruleset:` document of a multi-document YAML string
    pub fn parse_all(yaml_str: &str) -> Result<Vec<RuleSet>> {
        YamlParser::parse_multi_document(yaml_str)?
            .iter()
            .filter(|doc| YamlParser::has_field(doc, "ruleset"))
            .map(Self::parse_from_yaml)
            .collect()
    }

    /// Parse a rule set from YAML value
    pub fn parse_from_yaml(yaml: &YamlValue) -> Result<RuleSet> {
        let ruleset_obj = yaml.get("ruleset").ok_or_else(|| ParseError::MissingField {
            field: "ruleset".to_string(),
        })?;

        let id = YamlParser::get_string(ruleset_obj, "id")?;
        let mut builder = RuleSet::builder(&id);

        if let Some(label) = YamlParser::get_optional_scalar(ruleset_obj, "version") {
            builder = builder.label(label);
        }

        if let Some(schema) = ruleset_obj.get("schema") {
            let schema: Schema =
                serde_yaml::from_value(schema.clone()).map_err(|e| ParseError::InvalidValue {
                    field: "schema".to_string(),
                    message: e.to_string(),
                })?;
            builder = builder.schema(schema);
        }

        if let Some(tables) = ruleset_obj.get("tables") {
            for (name, values) in Self::parse_tables(tables)? {
                builder = builder.table(name, values);
            }
        }

        if let Some(rules) = YamlParser::get_optional_array(ruleset_obj, "rules") {
            let (rules, faults) = RuleParser::parse_all(rules);
            builder = builder.rules(rules);
            for fault in faults {
                builder = builder.fault(fault);
            }
        }

        if let Some(gates) = YamlParser::get_optional_array(ruleset_obj, "gates") {
            for gate in gates {
                builder = builder.gate(GateParser::parse_from_yaml(gate)?);
            }
        }

        let ruleset = builder.build()?;
        tracing::debug!(
            "Parsed rule set '{}' version {}",
            ruleset.id(),
            ruleset.version()
        );
        Ok(ruleset)
    }

    fn parse_tables(yaml: &YamlValue) -> Result<Vec<(String, Vec<Value>)>> {
        let mapping = yaml.as_mapping().ok_or_else(|| ParseError::InvalidValue {
            field: "tables".to_string(),
            message: "expected a mapping of table name to list".to_string(),
        })?;

        let mut tables = Vec::with_capacity(mapping.len());
        for (key, values) in mapping {
            let name = key.as_str().ok_or_else(|| ParseError::InvalidValue {
                field: "tables".to_string(),
                message: "table names must be strings".to_string(),
            })?;
            let entries = values.as_sequence().ok_or_else(|| ParseError::InvalidValue {
                field: format!("tables.{}", name),
                message: "expected a list".to_string(),
            })?;
            let entries = entries
                .iter()
                .map(YamlParser::to_value)
                .collect::<Result<Vec<_>>>()?;
            tables.push((name.to_string(), entries));
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_core::ast::FaultKind;
    use verdict_core::{Action, FieldType};

    const SAFETY: &str = r#"
ruleset:
  id: safety_guardrails
  version: "2024.1"
  schema:
    intent: string
    emotional_vulnerability: bool
    message: string
  tables:
    crisis_keywords: ["hopeless", "end it"]
  rules:
    - id: fin_vulnerable_block
      domain: financial
      action: block
      priority: 10
      severity: hard
      message: "We can't help with this right now."
      conditions:
        - { field: emotional_vulnerability, op: eq, value: true }
    - id: crisis_keyword_redirect
      domain: crisis
      action: redirect
      priority: 1
      message: "You're not alone."
      conditions:
        - { field: message, op: contains, table: crisis_keywords, case_sensitive: false }
"#;

    #[test]
    fn test_parse_ruleset() {
        let set = RuleSetParser::parse(SAFETY).unwrap();

        assert_eq!(set.id(), "safety_guardrails");
        assert_eq!(set.label(), "2024.1");
        assert!(set.version().starts_with("2024.1+"));
        assert_eq!(set.rules().len(), 2);
        assert_eq!(set.rules()[0].id, "crisis_keyword_redirect");
        assert_eq!(set.table("crisis_keywords").map(|t| t.len()), Some(2));
        assert_eq!(
            set.schema().and_then(|s| s.field_type("intent")),
            Some(FieldType::String)
        );
        assert!(set.faults().is_empty());
    }

    #[test]
    fn test_schema_rejects_unknown_field() {
        let yaml = SAFETY.replace("field: emotional_vulnerability", "field: vulnerability");
        let set = RuleSetParser::parse(&yaml).unwrap();

        assert_eq!(set.rules().len(), 1);
        assert_eq!(set.faults()[0].rule_id, "fin_vulnerable_block");
        assert_eq!(set.faults()[0].kind, FaultKind::MalformedRule);
        assert_eq!(set.most_restrictive_action("financial"), Action::Block);
    }

    #[test]
    fn test_unknown_operator_recorded_as_fault() {
        let yaml = SAFETY.replace("op: eq", "op: roughly");
        let set = RuleSetParser::parse(&yaml).unwrap();

        assert_eq!(set.faults().len(), 1);
        assert_eq!(set.faults()[0].kind, FaultKind::UnknownOperator);
        assert!(set.has_domain("financial"));
    }

    #[test]
    fn test_missing_ruleset_key() {
        let result = RuleSetParser::parse("rules: []");
        assert!(matches!(result, Err(ParseError::MissingField { .. })));
    }

    #[test]
    fn test_bad_table_is_document_error() {
        let yaml = "ruleset:\n  id: s\n  tables:\n    words: hello\n";
        assert!(matches!(
            RuleSetParser::parse(yaml),
            Err(ParseError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_parse_all_documents() {
        let yaml = format!("{}\n---\nruleset:\n  id: second\n", SAFETY);
        let sets = RuleSetParser::parse_all(&yaml).unwrap();
        let ids: Vec<&str> = sets.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["safety_guardrails", "second"]);
    }
}
