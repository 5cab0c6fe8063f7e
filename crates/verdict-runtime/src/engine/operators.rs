//! Operator execution
//!
//! Every function here returns `None` when the operands cannot be compared
//! (a type mismatch). Callers treat that as a non-match for both the
//! positive and the negated form of an operator, so a mismatch never turns
//! into a silent pass of a negated check.

use regex::Regex;
use verdict_core::{Operator, Value};

/// Apply `op` to a present (non-null) actual value
pub(crate) fn execute(
    op: Operator,
    actual: &Value,
    expected: &Value,
    patterns: &[Regex],
    case_sensitive: bool,
) -> bool {
    let positive = match op {
        Operator::Eq | Operator::Neq => values_equal(actual, expected, case_sensitive),
        Operator::Contains | Operator::NotContains => contains(actual, expected, case_sensitive),
        Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte => {
            return compare(op, actual, expected)
        }
        Operator::Matches => return matches_any(actual, patterns),
        Operator::In | Operator::NotIn => member(actual, expected, case_sensitive),
    };

    match positive {
        Some(result) if op.is_negated() => !result,
        Some(result) => result,
        None => {
            tracing::debug!(
                "Type mismatch: {} {} {}, treating as non-match",
                actual.type_name(),
                op,
                expected.type_name()
            );
            false
        }
    }
}

fn fold(s: &str, case_sensitive: bool) -> std::borrow::Cow<'_, str> {
    if case_sensitive {
        std::borrow::Cow::Borrowed(s)
    } else {
        std::borrow::Cow::Owned(s.to_lowercase())
    }
}

fn values_equal(left: &Value, right: &Value, case_sensitive: bool) -> Option<bool> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => Some(l == r),
        (Value::Bool(l), Value::Bool(r)) => Some(l == r),
        (Value::String(l), Value::String(r)) => {
            Some(fold(l, case_sensitive) == fold(r, case_sensitive))
        }
        (Value::Array(l), Value::Array(r)) => Some(
            l.len() == r.len()
                && l.iter()
                    .zip(r)
                    .all(|(a, b)| values_equal(a, b, case_sensitive) == Some(true)),
        ),
        (Value::Object(_), Value::Object(_)) => Some(left == right),
        _ => None,
    }
}

fn contains(actual: &Value, expected: &Value, case_sensitive: bool) -> Option<bool> {
    match (actual, expected) {
        (Value::String(haystack), Value::String(needle)) => {
            Some(fold(haystack, case_sensitive).contains(fold(needle, case_sensitive).as_ref()))
        }
        // Keyword tables: any entry appearing in the text
        (Value::String(haystack), Value::Array(needles)) => {
            let haystack = fold(haystack, case_sensitive);
            Some(needles.iter().filter_map(Value::as_str).any(|needle| {
                haystack.contains(fold(needle, case_sensitive).as_ref())
            }))
        }
        (Value::Array(items), Value::Array(needles)) => Some(items.iter().any(|item| {
            needles
                .iter()
                .any(|needle| values_equal(item, needle, case_sensitive) == Some(true))
        })),
        (Value::Array(items), needle) => Some(
            items
                .iter()
                .any(|item| values_equal(item, needle, case_sensitive) == Some(true)),
        ),
        _ => None,
    }
}

fn member(actual: &Value, expected: &Value, case_sensitive: bool) -> Option<bool> {
    let set = expected.as_array()?;
    let in_set = |value: &Value| {
        set.iter()
            .any(|candidate| values_equal(value, candidate, case_sensitive) == Some(true))
    };
    match actual {
        Value::Array(items) => Some(items.iter().any(in_set)),
        Value::Object(_) | Value::Null => None,
        scalar => Some(in_set(scalar)),
    }
}

fn compare(op: Operator, actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(l), Value::Number(r)) => match op {
            Operator::Gt => l > r,
            Operator::Lt => l < r,
            Operator::Gte => l >= r,
            Operator::Lte => l <= r,
            _ => false,
        },
        _ => false,
    }
}

fn matches_any(actual: &Value, patterns: &[Regex]) -> bool {
    match actual {
        Value::String(s) => patterns.iter().any(|p| p.is_match(s)),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .any(|s| patterns.iter().any(|p| p.is_match(s))),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(op: Operator, actual: impl Into<Value>, expected: impl Into<Value>) -> bool {
        execute(op, &actual.into(), &expected.into(), &[], true)
    }

    #[test]
    fn test_equality() {
        assert!(run(Operator::Eq, 0.6, 0.6));
        assert!(run(Operator::Eq, "success", "success"));
        assert!(!run(Operator::Eq, "Success", "success"));
        assert!(execute(
            Operator::Eq,
            &Value::from("Success"),
            &Value::from("success"),
            &[],
            false
        ));
        assert!(run(Operator::Neq, "failure", "success"));
    }

    #[test]
    fn test_type_mismatch_is_non_match_for_both_polarities() {
        assert!(!run(Operator::Eq, 1i64, "1"));
        assert!(!run(Operator::Neq, 1i64, "1"));
        assert!(!run(Operator::NotContains, 5i64, "x"));
        assert!(!run(Operator::Gt, "10", 5i64));
    }

    #[test]
    fn test_contains_on_strings_and_lists() {
        assert!(run(Operator::Contains, "please DROP TABLE users", "DROP TABLE"));
        assert!(run(Operator::Contains, vec![".env", "src/main.rs"], ".env"));
        assert!(!run(Operator::Contains, vec!["src/main.rs"], ".env"));
        assert!(run(Operator::NotContains, vec!["src/main.rs"], ".env"));
    }

    #[test]
    fn test_contains_keyword_table() {
        let keywords = Value::from(vec!["hopeless", "end it"]);
        assert!(execute(
            Operator::Contains,
            &Value::from("I feel HOPELESS"),
            &keywords,
            &[],
            false
        ));
        assert!(!execute(
            Operator::Contains,
            &Value::from("I feel fine"),
            &keywords,
            &[],
            false
        ));
    }

    #[test]
    fn test_ordering() {
        assert!(run(Operator::Gte, 0.8, 0.6));
        assert!(run(Operator::Gte, 0.6, 0.6));
        assert!(!run(Operator::Gt, 0.6, 0.6));
        assert!(run(Operator::Lt, 1i64, 2i64));
        assert!(run(Operator::Lte, 2i64, 2i64));
    }

    #[test]
    fn test_membership() {
        let roles = vec!["admin", "maintainer"];
        assert!(run(Operator::In, "admin", roles.clone()));
        assert!(!run(Operator::In, "member", roles.clone()));
        assert!(run(Operator::NotIn, "member", roles.clone()));
        assert!(run(Operator::In, vec!["member", "admin"], roles.clone()));
        assert!(!run(Operator::NotIn, vec!["member", "admin"], roles));
    }

    #[test]
    fn test_matches_any_pattern() {
        let patterns = vec![
            Regex::new(r"(^|/)\.env$").unwrap(),
            Regex::new(r"^\.github/workflows/").unwrap(),
        ];
        let files = Value::from(vec!["src/lib.rs", "config/.env"]);
        assert!(execute(Operator::Matches, &files, &Value::Null, &patterns, true));
        assert!(!execute(
            Operator::Matches,
            &Value::from("README.md"),
            &Value::Null,
            &patterns,
            true
        ));
        assert!(!execute(Operator::Matches, &Value::from(3i64), &Value::Null, &patterns, true));
    }
}
