//! Ordered gate evaluation

use super::condition::ConditionEvaluator;
use crate::result::{CheckTrace, Diagnostic, DiagnosticKind, GateOutcome};
use verdict_core::{EvaluationContext, OrderedGate};

/// Evaluates an ordered gate, stopping at the first failing check
pub struct GateEvaluator;

impl GateEvaluator {
    /// Evaluate the checks of `gate` in their configured order
    ///
    /// A check passes only when every pass condition matches. An unresolved
    /// condition fails the check, and so does a check that was malformed at
    /// load time. Checks after the first failure are not evaluated.
    pub fn evaluate(context: &EvaluationContext, gate: &OrderedGate) -> GateOutcome {
        let mut outcome = GateOutcome {
            gate_id: gate.id.clone(),
            domain: gate.domain().to_string(),
            passed: true,
            blocking_check: None,
            blocking_index: None,
            explanation_code: None,
            message: None,
            alternatives: None,
            checks: Vec::new(),
            diagnostics: Vec::new(),
        };

        for (index, check) in gate.checks.iter().enumerate() {
            let rule_id = format!("{}.{}", gate.id, check.name);

            let trace = if let Some(reason) = check.fault() {
                outcome.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedCheck,
                    &rule_id,
                    reason,
                ));
                CheckTrace {
                    name: check.name.clone(),
                    passed: false,
                    conditions: Vec::new(),
                }
            } else {
                let conditions: Vec<_> = check
                    .conditions
                    .iter()
                    .map(|condition| ConditionEvaluator::evaluate(context, condition))
                    .collect();
                let missing: Vec<&str> = conditions
                    .iter()
                    .filter(|c| c.outcome.is_unresolved())
                    .map(|c| c.field.as_str())
                    .collect();
                if !missing.is_empty() {
                    outcome.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::MissingRequiredInput,
                        &rule_id,
                        format!("missing: {}", missing.join(", ")),
                    ));
                }
                CheckTrace {
                    name: check.name.clone(),
                    passed: conditions.iter().all(|c| c.outcome.is_match()),
                    conditions,
                }
            };

            let passed = trace.passed;
            outcome.checks.push(trace);

            if !passed {
                tracing::debug!("Gate '{}' blocked at check '{}'", gate.id, check.name);
                outcome.passed = false;
                outcome.blocking_check = Some(check.name.clone());
                outcome.blocking_index = Some(index);
                outcome.explanation_code = Some(check.explanation_code().to_string());
                outcome.message = Some(check.message.clone()).filter(|m| !m.is_empty());
                outcome.alternatives = check.alternatives.clone();
                break;
            }
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_core::{Action, Condition, GateCheck, Operator, RuleSet};

    fn gate() -> OrderedGate {
        let set = RuleSet::builder("m")
            .gate(
                OrderedGate::new("monetization")
                    .check(
                        GateCheck::new("explicit_refusal")
                            .with_message("Not now.")
                            .require(Condition::new("explicit_refusal", Operator::Neq, true)),
                    )
                    .check(
                        GateCheck::new("readiness_threshold")
                            .with_code("READINESS_LOW")
                            .with_message("Not yet.")
                            .require(Condition::new("readiness_score", Operator::Gte, 0.6)),
                    )
                    .check(
                        GateCheck::new("no_blockers")
                            .with_message("Blocked.")
                            .require(Condition::new("blocker_count", Operator::Eq, 0i64)),
                    ),
            )
            .build()
            .unwrap();
        set.gate("monetization").unwrap().clone()
    }

    #[test]
    fn test_all_checks_pass() {
        let ctx = EvaluationContext::new()
            .with("explicit_refusal", false)
            .with("readiness_score", 0.8)
            .with("blocker_count", 0i64);
        let outcome = GateEvaluator::evaluate(&ctx, &gate());

        assert!(outcome.passed);
        assert!(outcome.blocking_check.is_none());
        assert_eq!(outcome.checks.len(), 3);
        assert_eq!(outcome.action(), Action::Allow);
    }

    #[test]
    fn test_short_circuits_at_first_failure() {
        let ctx = EvaluationContext::new()
            .with("explicit_refusal", false)
            .with("readiness_score", 0.3)
            .with("blocker_count", 2i64);
        let outcome = GateEvaluator::evaluate(&ctx, &gate());

        assert!(!outcome.passed);
        assert_eq!(outcome.blocking_check.as_deref(), Some("readiness_threshold"));
        assert_eq!(outcome.evaluated_checks(), vec!["explicit_refusal", "readiness_threshold"]);
        assert_eq!(outcome.explanation_code.as_deref(), Some("READINESS_LOW"));
        assert_eq!(outcome.message.as_deref(), Some("Not yet."));
    }

    #[test]
    fn test_unresolved_check_fails() {
        let ctx = EvaluationContext::new().with("explicit_refusal", false);
        let outcome = GateEvaluator::evaluate(&ctx, &gate());

        assert_eq!(outcome.blocking_check.as_deref(), Some("readiness_threshold"));
        assert!(outcome
            .diagnostics
            .iter()
            .any(|d| d.kind == DiagnosticKind::MissingRequiredInput));
    }

    #[test]
    fn test_faulted_check_fails_closed() {
        let set = RuleSet::builder("m")
            .gate(
                OrderedGate::new("g")
                    .check(GateCheck::new("broken").with_message("m"))
                    .check(
                        GateCheck::new("later")
                            .with_message("m")
                            .require(Condition::new("x", Operator::Eq, 1i64)),
                    ),
            )
            .build()
            .unwrap();
        let outcome = GateEvaluator::evaluate(
            &EvaluationContext::new().with("x", 1i64),
            set.gate("g").unwrap(),
        );

        assert_eq!(outcome.blocking_check.as_deref(), Some("broken"));
        assert_eq!(outcome.checks.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::MalformedCheck);
    }

    #[test]
    fn test_into_domain_result() {
        let ctx = EvaluationContext::new().with("explicit_refusal", true);
        let result = GateEvaluator::evaluate(&ctx, &gate()).into_domain_result();

        assert_eq!(result.domain, "monetization");
        assert_eq!(result.action, Action::Block);
        assert_eq!(result.triggered_rules, vec!["monetization.explicit_refusal"]);
        assert_eq!(result.winning_priority, Some(0));
        assert_eq!(result.traces.len(), 1);
    }
}
