//! Context schema declarations
//!
//! A rule set may declare the fields its context carries. When a schema is
//! present, rules referencing undeclared fields, or comparing a field with
//! an operator its type cannot support, are rejected at load time.

use crate::ast::Operator;
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared type of a context field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Bool,
    Number,
    String,
    List,
    Any,
}

impl FieldType {
    /// Whether `op` can ever match a field of this type
    pub fn supports(&self, op: Operator) -> bool {
        match self {
            FieldType::Any => true,
            FieldType::Number => !matches!(
                op,
                Operator::Contains | Operator::NotContains | Operator::Matches
            ),
            FieldType::Bool => matches!(
                op,
                Operator::Eq | Operator::Neq | Operator::In | Operator::NotIn
            ),
            FieldType::String => !op.is_ordering(),
            FieldType::List => !op.is_ordering(),
        }
    }

    /// Whether a context value conforms to this declared type
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (FieldType::Any, _)
                | (_, Value::Null)
                | (FieldType::Bool, Value::Bool(_))
                | (FieldType::Number, Value::Number(_))
                | (FieldType::String, Value::String(_))
                | (FieldType::List, Value::Array(_))
        )
    }
}

/// Field name to declared type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldType>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field
    pub fn with_field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.insert(name.into(), field_type);
        self
    }

    /// Look up a field; dotted paths resolve against their top-level segment
    pub fn field_type(&self, path: &str) -> Option<FieldType> {
        if let Some(t) = self.fields.get(path) {
            return Some(*t);
        }
        let root = path.split('.').next()?;
        self.fields.get(root).map(|_| FieldType::Any)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
