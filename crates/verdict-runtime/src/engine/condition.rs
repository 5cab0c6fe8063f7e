//! Condition evaluation

use super::operators;
use crate::result::{ConditionOutcome, ConditionTrace};
use verdict_core::{Condition, EvaluationContext, Value};

/// Evaluates one condition against a context
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Evaluate a condition; total over every context
    ///
    /// An absent or null field is `Unresolved` for every operator, the
    /// negated ones included. So is a value that breaks the field's declared
    /// schema type, and a non-finite number.
    pub fn evaluate(context: &EvaluationContext, condition: &Condition) -> ConditionTrace {
        let expected = condition.expected().clone();

        let Some(actual) = context.get(&condition.field) else {
            tracing::debug!(
                "Condition on '{}' unresolved: field missing",
                condition.field
            );
            return ConditionTrace::new(
                &condition.field,
                condition.op,
                expected,
                None,
                ConditionOutcome::Unresolved,
            );
        };

        if let Some(reason) = Self::unusable(condition, actual) {
            tracing::debug!(
                "Condition on '{}' unresolved: {}",
                condition.field,
                reason
            );
            return ConditionTrace::new(
                &condition.field,
                condition.op,
                expected,
                Some(actual.clone()),
                ConditionOutcome::Unresolved,
            );
        }

        let matched = operators::execute(
            condition.op,
            actual,
            &expected,
            condition.patterns(),
            condition.case_sensitive,
        );

        ConditionTrace::new(
            &condition.field,
            condition.op,
            expected,
            Some(actual.clone()),
            if matched {
                ConditionOutcome::Matched
            } else {
                ConditionOutcome::NotMatched
            },
        )
    }

    fn unusable(condition: &Condition, actual: &Value) -> Option<&'static str> {
        if !actual.is_finite() {
            return Some("non-finite number");
        }
        match condition.declared_type() {
            Some(field_type) if !field_type.accepts(actual) => Some("value breaks declared type"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use verdict_core::{FieldType, Operator, Schema};

    #[test]
    fn test_missing_field_is_unresolved_for_negated_operators() {
        let ctx = EvaluationContext::new();
        for op in [Operator::Neq, Operator::NotContains] {
            let condition = Condition::new("ci_status", op, "success");
            let trace = ConditionEvaluator::evaluate(&ctx, &condition);
            assert_eq!(trace.outcome, ConditionOutcome::Unresolved);
            assert!(trace.actual.is_none());
        }
    }

    #[test]
    fn test_null_field_is_unresolved() {
        let ctx = EvaluationContext::new().with("trust_score", Value::Null);
        let condition = Condition::new("trust_score", Operator::Gte, 0.5);
        let trace = ConditionEvaluator::evaluate(&ctx, &condition);
        assert!(trace.outcome.is_unresolved());
    }

    #[test]
    fn test_trace_records_actual_and_expected() {
        let ctx = EvaluationContext::new().with("readiness_score", 0.8);
        let trace = ConditionEvaluator::evaluate(
            &ctx,
            &Condition::new("readiness_score", Operator::Gte, 0.6),
        );

        assert_eq!(trace.outcome, ConditionOutcome::Matched);
        assert_eq!(trace.actual, Some(Value::from(0.8)));
        assert_eq!(trace.expected, Value::from(0.6));
        assert_eq!(trace.operator, Operator::Gte);
    }

    #[test]
    fn test_nested_field() {
        let ctx: EvaluationContext =
            serde_json::from_str(r#"{"pr": {"lines_changed": 1200}}"#).unwrap();
        let trace = ConditionEvaluator::evaluate(
            &ctx,
            &Condition::new("pr.lines_changed", Operator::Gt, 500i64),
        );
        assert!(trace.outcome.is_match());
    }

    #[test]
    fn test_wrong_type_for_declared_field_is_unresolved() {
        let schema = Schema::new().with_field("ci_status", FieldType::String);
        let mut condition = Condition::new("ci_status", Operator::Neq, "success");
        condition.compile(&BTreeMap::new(), Some(&schema)).unwrap();

        let ctx = EvaluationContext::new().with("ci_status", true);
        let trace = ConditionEvaluator::evaluate(&ctx, &condition);
        assert!(trace.outcome.is_unresolved());
        assert_eq!(trace.actual, Some(Value::Bool(true)));

        let ctx = EvaluationContext::new().with("ci_status", "failure");
        assert!(ConditionEvaluator::evaluate(&ctx, &condition).outcome.is_match());
    }

    #[test]
    fn test_undeclared_types_are_compared_as_usual() {
        let ctx = EvaluationContext::new().with("ci_status", true);
        let condition = Condition::new("ci_status", Operator::Neq, "success");
        let trace = ConditionEvaluator::evaluate(&ctx, &condition);
        assert_eq!(trace.outcome, ConditionOutcome::NotMatched);
    }

    #[test]
    fn test_non_finite_number_is_unresolved() {
        for n in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let ctx = EvaluationContext::new().with("readiness_score", n);
            let condition = Condition::new("readiness_score", Operator::Neq, 0.5);
            let trace = ConditionEvaluator::evaluate(&ctx, &condition);
            assert!(trace.outcome.is_unresolved());
        }
    }
}
