//! Evaluation engine
//!
//! Leaf-first: conditions, rules, domains and ordered gates, then the
//! aggregator and the evaluator that drives a whole decision.

mod aggregate;
mod condition;
mod domain;
mod evaluator;
mod gate;
mod operators;
mod rule;

pub use aggregate::DecisionAggregator;
pub use condition::ConditionEvaluator;
pub use domain::DomainEvaluator;
pub use evaluator::{ExecutionMode, PolicyEvaluator};
pub use gate::GateEvaluator;
pub use rule::{RuleEvaluator, RuleVerdict};
