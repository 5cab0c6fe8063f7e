//! Verdict Core - Core types and definitions for the Verdict policy gate engine
//!
//! This crate provides the fundamental types used across the Verdict crates:
//! - Value types for context facts
//! - Rule model (actions, operators, conditions, rules, ordered gates)
//! - Versioned, load-time validated rule sets
//! - The per-decision evaluation context and its content hash
//! - Error types

pub mod ast;
pub mod context;
pub mod error;
pub mod hashing;
pub mod types;

// Re-export commonly used types
pub use ast::{
    Action, Condition, FaultKind, GateCheck, OrderedGate, Operator, Rule, RuleFault, RuleSet,
    RuleSetBuilder, Severity,
};
pub use context::EvaluationContext;
pub use error::{CoreError, Result};
pub use types::{FieldType, Schema, Value};
