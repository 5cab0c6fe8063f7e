//! Evaluation result and trace types

mod decision;
mod domain;
mod gate;
mod trace;

pub use decision::FinalDecision;
pub use domain::{Diagnostic, DiagnosticKind, DomainResult};
pub use gate::GateOutcome;
pub use trace::{CheckTrace, ConditionOutcome, ConditionTrace, RuleTrace};
