//! YAML Parser
//!
//! Provides utilities for parsing YAML content into structured data.

use crate::error::{ParseError, Result};
use serde::Deserialize;
use serde_yaml::Value as YamlValue;
use verdict_core::Value;

/// YAML parser utilities
pub struct YamlParser;

impl YamlParser {
    /// Parse YAML string into a YAML value
    pub fn parse(yaml_str: &str) -> Result<YamlValue> {
        serde_yaml::from_str(yaml_str).map_err(|e| ParseError::ParseError(e.to_string()))
    }

    /// Parse YAML string containing multiple documents separated by `---`
    ///
    /// Empty documents (e.g. a leading separator) are dropped.
    pub fn parse_multi_document(yaml_str: &str) -> Result<Vec<YamlValue>> {
        let mut documents = Vec::new();

        for document in serde_yaml::Deserializer::from_str(yaml_str) {
            let value = YamlValue::deserialize(document)
                .map_err(|e| ParseError::ParseError(e.to_string()))?;
            if !value.is_null() {
                documents.push(value);
            }
        }

        Ok(documents)
    }

    /// Get a required string field from YAML object
    pub fn get_string(obj: &YamlValue, field: &str) -> Result<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ParseError::MissingField {
                field: field.to_string(),
            })
    }

    /// Get an optional string field from YAML object
    pub fn get_optional_string(obj: &YamlValue, field: &str) -> Option<String> {
        obj.get(field)
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
    }

    /// Get an optional scalar field rendered as a string
    ///
    /// Accepts unquoted numbers, so `version: 2024.1` and `version: "2024.1"`
    /// read the same.
    pub fn get_optional_scalar(obj: &YamlValue, field: &str) -> Option<String> {
        match obj.get(field)? {
            YamlValue::String(s) => Some(s.clone()),
            YamlValue::Number(n) => Some(n.to_string()),
            YamlValue::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Get an optional integer field; present but non-integer values are an error
    pub fn get_optional_i32(obj: &YamlValue, field: &str) -> Result<Option<i32>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(v) => v
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| Self::invalid(field, "expected an integer")),
        }
    }

    /// Get an optional float field; present but non-numeric values are an error
    pub fn get_optional_f64(obj: &YamlValue, field: &str) -> Result<Option<f64>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(v) => v
                .as_f64()
                .map(Some)
                .ok_or_else(|| Self::invalid(field, "expected a number")),
        }
    }

    /// Get an optional boolean field; present but non-boolean values are an error
    pub fn get_optional_bool(obj: &YamlValue, field: &str) -> Result<Option<bool>> {
        match obj.get(field) {
            None | Some(YamlValue::Null) => Ok(None),
            Some(v) => v
                .as_bool()
                .map(Some)
                .ok_or_else(|| Self::invalid(field, "expected a boolean")),
        }
    }

    /// Get an optional array field from YAML object
    pub fn get_optional_array<'a>(obj: &'a YamlValue, field: &str) -> Option<&'a Vec<YamlValue>> {
        obj.get(field).and_then(|v| v.as_sequence())
    }

    /// Check if a field exists
    pub fn has_field(obj: &YamlValue, field: &str) -> bool {
        obj.get(field).is_some()
    }

    /// Convert a YAML value into an engine value
    pub fn to_value(yaml: &YamlValue) -> Result<Value> {
        serde_yaml::from_value(yaml.clone()).map_err(ParseError::from)
    }

    fn invalid(field: &str, message: &str) -> ParseError {
        ParseError::InvalidValue {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multi_document_skips_empty() {
        let yaml = "---\nruleset:\n  id: a\n---\nruleset:\n  id: b\n";
        let docs = YamlParser::parse_multi_document(yaml).unwrap();
        assert_eq!(docs.len(), 2);
    }

    #[test]
    fn test_scalar_accepts_numbers() {
        let yaml = YamlParser::parse("version: 2024.1\nlabel: \"v2\"").unwrap();
        assert_eq!(
            YamlParser::get_optional_scalar(&yaml, "version").as_deref(),
            Some("2024.1")
        );
        assert_eq!(
            YamlParser::get_optional_scalar(&yaml, "label").as_deref(),
            Some("v2")
        );
        assert!(YamlParser::get_optional_scalar(&yaml, "missing").is_none());
    }

    #[test]
    fn test_optional_i32_rejects_strings() {
        let yaml = YamlParser::parse("priority: high").unwrap();
        assert!(YamlParser::get_optional_i32(&yaml, "priority").is_err());

        let yaml = YamlParser::parse("priority: 10").unwrap();
        assert_eq!(YamlParser::get_optional_i32(&yaml, "priority").unwrap(), Some(10));
    }

    #[test]
    fn test_to_value_converts_integers_to_numbers() {
        let yaml = YamlParser::parse("[1, two, true]").unwrap();
        let value = YamlParser::to_value(&yaml).unwrap();
        assert_eq!(
            value,
            Value::Array(vec![Value::Number(1.0), Value::from("two"), Value::Bool(true)])
        );
    }
}
