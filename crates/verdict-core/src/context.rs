//! Evaluation context
//!
//! The flat bundle of facts a single decision is evaluated against. Field
//! lookups accept dotted paths, which descend into object values. A field
//! holding `null` is indistinguishable from an absent one.

use crate::error::Result;
use crate::hashing;
use crate::types::{Schema, Value};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable input to one evaluation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvaluationContext {
    fields: BTreeMap<String, Value>,
}

impl EvaluationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Resolve a field path; `None` when absent or null
    pub fn get(&self, path: &str) -> Option<&Value> {
        let value = match self.fields.get(path) {
            Some(v) => v,
            None => {
                let mut segments = path.split('.');
                let root = segments.next()?;
                let mut current = self.fields.get(root)?;
                for key in segments {
                    match current {
                        Value::Object(map) => current = map.get(key)?,
                        _ => return None,
                    }
                }
                current
            }
        };
        Some(value).filter(|v| !v.is_null())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_some()
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Stable SHA-256 over the canonical serialization of the context
    pub fn input_hash(&self) -> Result<String> {
        hashing::digest(&self.fields)
    }

    /// Fields whose values do not conform to the declared schema
    pub fn schema_violations(&self, schema: &Schema) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(name, value)| {
                schema
                    .field_type(name)
                    .is_some_and(|field_type| !field_type.accepts(value))
            })
            .map(|(name, _)| name.clone())
            .collect()
    }
}

impl From<BTreeMap<String, Value>> for EvaluationContext {
    fn from(fields: BTreeMap<String, Value>) -> Self {
        Self { fields }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for EvaluationContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldType;

    #[test]
    fn test_get_flat_and_nested() {
        let mut pr = BTreeMap::new();
        pr.insert("title".to_string(), Value::from("Fix login"));
        let ctx = EvaluationContext::new()
            .with("role", "member")
            .with("pr", Value::Object(pr));

        assert_eq!(ctx.get("role"), Some(&Value::from("member")));
        assert_eq!(ctx.get("pr.title"), Some(&Value::from("Fix login")));
        assert_eq!(ctx.get("pr.body"), None);
        assert_eq!(ctx.get("role.name"), None);
    }

    #[test]
    fn test_null_is_missing() {
        let ctx = EvaluationContext::new().with("trust_score", Value::Null);
        assert!(!ctx.contains("trust_score"));
    }

    #[test]
    fn test_input_hash_is_order_independent() {
        let a = EvaluationContext::new().with("x", 1i64).with("y", "z");
        let b: EvaluationContext = vec![("y", Value::from("z")), ("x", Value::from(1i64))]
            .into_iter()
            .collect();

        assert_eq!(a.input_hash().unwrap(), b.input_hash().unwrap());
        assert_ne!(
            a.input_hash().unwrap(),
            a.clone().with("x", 2i64).input_hash().unwrap()
        );
    }

    #[test]
    fn test_schema_violations() {
        let schema = Schema::new().with_field("readiness_score", FieldType::Number);
        let ctx = EvaluationContext::new()
            .with("readiness_score", "high")
            .with("other", 1i64);

        assert_eq!(ctx.schema_violations(&schema), vec!["readiness_score".to_string()]);
    }
}
