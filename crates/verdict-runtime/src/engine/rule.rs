//! Rule evaluation

use super::condition::ConditionEvaluator;
use crate::result::RuleTrace;
use verdict_core::{EvaluationContext, Rule};

/// Verdict for one rule
#[derive(Debug, Clone, PartialEq)]
pub struct RuleVerdict {
    /// Every condition matched
    pub matched: bool,
    /// At least one condition could not be resolved
    pub unresolved: bool,
    pub trace: RuleTrace,
}

/// Evaluates one rule (conjunction of its conditions)
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// Evaluate a rule; `None` for inactive rules, which leave no trace
    ///
    /// Conditions are not short-circuited: the trace always covers every
    /// condition of the rule.
    pub fn evaluate(context: &EvaluationContext, rule: &Rule) -> Option<RuleVerdict> {
        if !rule.active {
            return None;
        }

        let trace = rule
            .conditions
            .iter()
            .map(|condition| ConditionEvaluator::evaluate(context, condition))
            .fold(RuleTrace::new(&rule.id), RuleTrace::add_condition);

        let matched = trace.conditions.iter().all(|c| c.outcome.is_match());
        let unresolved = trace.conditions.iter().any(|c| c.outcome.is_unresolved());

        tracing::debug!(
            "Rule '{}': matched={}, unresolved={}",
            rule.id,
            matched,
            unresolved
        );

        let trace = RuleTrace {
            matched,
            unresolved,
            ..trace
        };

        Some(RuleVerdict {
            matched,
            unresolved,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdict_core::{Action, Condition, Operator};

    fn rule() -> Rule {
        Rule::new("fin_vulnerable", "financial", Action::Block)
            .with_message("no")
            .when(Condition::new("emotional_vulnerability", Operator::Eq, true))
            .when(Condition::new("intent", Operator::Eq, "invest"))
    }

    #[test]
    fn test_all_conditions_must_match() {
        let ctx = EvaluationContext::new()
            .with("emotional_vulnerability", true)
            .with("intent", "chat");
        let verdict = RuleEvaluator::evaluate(&ctx, &rule()).unwrap();

        assert!(!verdict.matched);
        assert!(!verdict.unresolved);
        assert_eq!(verdict.trace.conditions.len(), 2);
    }

    #[test]
    fn test_every_condition_is_traced_after_a_miss() {
        let ctx = EvaluationContext::new().with("emotional_vulnerability", false);
        let verdict = RuleEvaluator::evaluate(&ctx, &rule()).unwrap();

        assert_eq!(verdict.trace.conditions.len(), 2);
        assert!(verdict.unresolved);
        assert_eq!(verdict.trace.missing_fields(), vec!["intent"]);
    }

    #[test]
    fn test_inactive_rule_leaves_no_trace() {
        let ctx = EvaluationContext::new();
        assert!(RuleEvaluator::evaluate(&ctx, &rule().inactive()).is_none());
    }

    #[test]
    fn test_rule_without_conditions_matches() {
        let rule = Rule::new("always", "d", Action::Allow);
        let verdict = RuleEvaluator::evaluate(&EvaluationContext::new(), &rule).unwrap();
        assert!(verdict.matched);
    }
}
