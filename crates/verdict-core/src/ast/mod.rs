//! Rule model definitions
//!
//! This module contains the declarative policy model:
//! - Actions and their restriction order
//! - Operators and conditions
//! - Rules
//! - Ordered (short-circuit) gates
//! - Versioned rule sets

pub mod action;
pub mod condition;
pub mod gate;
pub mod operator;
pub mod rule;
pub mod ruleset;

pub use action::Action;
pub use condition::Condition;
pub use gate::{GateCheck, OrderedGate};
pub use operator::Operator;
pub use rule::{Rule, Severity};
pub use ruleset::{FaultKind, RuleFault, RuleSet, RuleSetBuilder};
