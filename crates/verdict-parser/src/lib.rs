//! Verdict Parser - YAML to rule-set parser for the Verdict policy gate engine
//!
//! This crate converts YAML rule-set documents into validated
//! [`verdict_core::RuleSet`] values. Structural problems of the document
//! itself are errors; problems confined to a single rule or gate check are
//! recorded as rule faults so the rest of the set stays usable.

pub mod error;
pub mod gate_parser;
pub mod rule_parser;
pub mod ruleset_parser;
pub mod yaml_parser;

// Re-export main parser types
pub use error::{ParseError, Result};
pub use gate_parser::GateParser;
pub use rule_parser::RuleParser;
pub use ruleset_parser::RuleSetParser;
pub use yaml_parser::YamlParser;
