//! Common test utilities for runtime integration tests

#![allow(dead_code)]

use verdict_core::{Action, Condition, EvaluationContext, Operator, Rule, RuleSet};
use verdict_runtime::{FinalDecision, PolicyEvaluator};

/// Rule triggering `action` in `domain` when the boolean `flag` is true
pub fn flag_rule(id: &str, domain: &str, action: Action, priority: i32, flag: &str) -> Rule {
    Rule::new(id, domain, action)
        .with_priority(priority)
        .with_message(format!("{} triggered", id))
        .when(Condition::new(flag, Operator::Eq, true))
}

/// One domain per action, each guarded by its own flag
pub fn four_domain_rule_set() -> RuleSet {
    RuleSet::builder("four_domains")
        .label("test")
        .rule(flag_rule("a_block", "alpha", Action::Block, 10, "flag_a"))
        .rule(flag_rule("b_redirect", "beta", Action::Redirect, 20, "flag_b"))
        .rule(flag_rule("c_restrict", "gamma", Action::Restrict, 30, "flag_c"))
        .rule(flag_rule("d_block", "delta", Action::Block, 5, "flag_d"))
        .build()
        .expect("rule set builds")
}

/// Context with every flag set as given (`[a, b, c, d]`)
pub fn flags(values: [bool; 4]) -> EvaluationContext {
    EvaluationContext::new()
        .with("flag_a", values[0])
        .with("flag_b", values[1])
        .with("flag_c", values[2])
        .with("flag_d", values[3])
}

pub fn decide(rule_set: &RuleSet, context: &EvaluationContext) -> FinalDecision {
    PolicyEvaluator::default()
        .evaluate_all(rule_set, context)
        .expect("evaluation succeeds")
}
