//! Condition definitions
//!
//! A condition is one atomic predicate: a field path, an operator and the
//! value to compare against. The comparison value is either a literal or a
//! reference to a named table of the rule set. Tables and patterns are
//! resolved once, when the rule set is built, so evaluation never has to
//! look anything up or compile anything.

use crate::ast::Operator;
use crate::types::{FieldType, Schema, Value};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn default_case_sensitive() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// A single predicate over one context field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    /// Field path into the context (e.g. "readiness_score" or "pr.title")
    pub field: String,

    /// Comparison operator
    pub op: Operator,

    /// Literal comparison value
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub value: Value,

    /// Name of a rule-set table used as the comparison value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// String comparisons are case sensitive unless disabled
    #[serde(default = "default_case_sensitive", skip_serializing_if = "is_true")]
    pub case_sensitive: bool,

    #[serde(skip)]
    resolved: Option<Value>,

    #[serde(skip)]
    patterns: Vec<Regex>,

    #[serde(skip)]
    declared_type: Option<FieldType>,
}

impl PartialEq for Condition {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.op == other.op
            && self.value == other.value
            && self.table == other.table
            && self.case_sensitive == other.case_sensitive
    }
}

impl Condition {
    /// Create a condition with a literal comparison value
    pub fn new(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
            table: None,
            case_sensitive: true,
            resolved: None,
            patterns: Vec::new(),
            declared_type: None,
        }
    }

    /// Create a condition comparing against a named table
    pub fn with_table(field: impl Into<String>, op: Operator, table: impl Into<String>) -> Self {
        Self {
            table: Some(table.into()),
            ..Self::new(field, op, Value::Null)
        }
    }

    /// Make string comparisons case insensitive
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// The value conditions are compared against (table contents once resolved)
    pub fn expected(&self) -> &Value {
        self.resolved.as_ref().unwrap_or(&self.value)
    }

    /// Compiled patterns for `matches`; empty for every other operator
    pub fn patterns(&self) -> &[Regex] {
        &self.patterns
    }

    /// Type the rule set's schema declares for the field, once compiled
    pub fn declared_type(&self) -> Option<FieldType> {
        self.declared_type
    }

    /// Resolve table references, compile patterns and check operand types
    ///
    /// Returns a human-readable reason when the condition is malformed.
    pub fn compile(
        &mut self,
        tables: &BTreeMap<String, Vec<Value>>,
        schema: Option<&Schema>,
    ) -> std::result::Result<(), String> {
        if self.field.trim().is_empty() {
            return Err("condition has an empty field path".to_string());
        }

        if let Some(name) = &self.table {
            let values = tables
                .get(name)
                .ok_or_else(|| format!("unknown table '{}'", name))?;
            self.resolved = Some(Value::Array(values.clone()));
        }

        if let Some(schema) = schema.filter(|s| !s.is_empty()) {
            let field_type = schema
                .field_type(&self.field)
                .ok_or_else(|| format!("unknown field '{}'", self.field))?;
            if !field_type.supports(self.op) {
                return Err(format!(
                    "operator '{}' cannot apply to {:?} field '{}'",
                    self.op, field_type, self.field
                ));
            }
            self.declared_type = Some(field_type);
        }

        let expected = self.expected().clone();
        match (self.op, &expected) {
            (_, Value::Null) => {
                return Err(format!("operator '{}' requires a comparison value", self.op));
            }
            (op, Value::Number(_)) if op.is_ordering() => {}
            (op, other) if op.is_ordering() => {
                return Err(format!(
                    "operator '{}' requires a number, got {}",
                    op,
                    other.type_name()
                ));
            }
            (op, Value::Array(_)) if op.is_membership() => {}
            (op, other) if op.is_membership() => {
                return Err(format!(
                    "operator '{}' requires a list, got {}",
                    op,
                    other.type_name()
                ));
            }
            (Operator::Matches, _) => {
                self.patterns = self.compile_patterns(&expected)?;
            }
            _ => {}
        }

        Ok(())
    }

    fn compile_patterns(&self, expected: &Value) -> std::result::Result<Vec<Regex>, String> {
        let sources: Vec<&str> = match expected {
            Value::String(s) => vec![s.as_str()],
            Value::Array(items) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .ok_or_else(|| format!("pattern must be a string, got {}", v.type_name()))
                })
                .collect::<std::result::Result<_, _>>()?,
            other => {
                return Err(format!(
                    "operator 'matches' requires a pattern, got {}",
                    other.type_name()
                ))
            }
        };

        if sources.is_empty() {
            return Err("operator 'matches' requires at least one pattern".to_string());
        }

        sources
            .into_iter()
            .map(|src| {
                RegexBuilder::new(src)
                    .case_insensitive(!self.case_sensitive)
                    .build()
                    .map_err(|e| format!("invalid pattern '{}': {}", src, e))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    fn no_tables() -> BTreeMap<String, Vec<Value>> {
        BTreeMap::new()
    }

    #[test]
    fn test_compile_resolves_table() {
        let mut tables = BTreeMap::new();
        tables.insert(
            "blocking_states".to_string(),
            vec![Value::from("refused"), Value::from("cooldown")],
        );

        let mut cond = Condition::with_table("state", Operator::In, "blocking_states");
        cond.compile(&tables, None).unwrap();

        assert_eq!(cond.expected().as_array().map(|a| a.len()), Some(2));
        assert_eq!(cond.value, Value::Null);
    }

    #[test]
    fn test_compile_rejects_unknown_table() {
        let mut cond = Condition::with_table("state", Operator::In, "missing");
        let err = cond.compile(&no_tables(), None).unwrap_err();
        assert!(err.contains("unknown table"));
    }

    #[test]
    fn test_compile_rejects_non_numeric_ordering() {
        let mut cond = Condition::new("score", Operator::Gt, "high");
        assert!(cond.compile(&no_tables(), None).is_err());
    }

    #[test]
    fn test_compile_rejects_scalar_membership() {
        let mut cond = Condition::new("role", Operator::In, "admin");
        assert!(cond.compile(&no_tables(), None).is_err());
    }

    #[test]
    fn test_compile_rejects_invalid_regex() {
        let mut cond = Condition::new("path", Operator::Matches, "([unclosed");
        let err = cond.compile(&no_tables(), None).unwrap_err();
        assert!(err.contains("invalid pattern"));
    }

    #[test]
    fn test_compile_case_insensitive_pattern() {
        let mut cond = Condition::new("title", Operator::Matches, "^wip").case_insensitive();
        cond.compile(&no_tables(), None).unwrap();
        assert!(cond.patterns()[0].is_match("WIP: draft"));
    }

    #[test]
    fn test_compile_checks_schema() {
        let schema = Schema::new().with_field("role", FieldType::String);

        let mut unknown = Condition::new("tier", Operator::Eq, "gold");
        assert!(unknown
            .compile(&no_tables(), Some(&schema))
            .unwrap_err()
            .contains("unknown field"));

        let mut wrong_op = Condition::new("role", Operator::Gt, 1.0);
        assert!(wrong_op.compile(&no_tables(), Some(&schema)).is_err());

        let mut ok = Condition::new("role", Operator::Eq, "admin");
        assert!(ok.declared_type().is_none());
        assert!(ok.compile(&no_tables(), Some(&schema)).is_ok());
        assert_eq!(ok.declared_type(), Some(FieldType::String));
    }

    #[test]
    fn test_condition_deserializes_with_defaults() {
        let cond: Condition =
            serde_json::from_str(r#"{"field": "ci_status", "op": "neq", "value": "success"}"#)
                .unwrap();
        assert_eq!(cond.op, Operator::Neq);
        assert!(cond.case_sensitive);
        assert!(cond.table.is_none());
    }
}
