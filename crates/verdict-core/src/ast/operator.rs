//! Condition operators
//!
//! The operator set is closed: rule definitions naming anything else are
//! rejected when the rule set is loaded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Comparison operators available to conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// Equal
    Eq,
    /// Not equal
    Neq,
    /// Substring (strings) or element (lists) containment
    Contains,
    /// Negated containment
    NotContains,
    /// Greater than (numbers only)
    Gt,
    /// Less than (numbers only)
    Lt,
    /// Greater than or equal (numbers only)
    Gte,
    /// Less than or equal (numbers only)
    Lte,
    /// Regular expression match
    Matches,
    /// Set membership
    In,
    /// Set exclusion
    NotIn,
}

impl Operator {
    /// Canonical operator name
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::Gt => "gt",
            Operator::Lt => "lt",
            Operator::Gte => "gte",
            Operator::Lte => "lte",
            Operator::Matches => "matches",
            Operator::In => "in",
            Operator::NotIn => "not_in",
        }
    }

    /// Returns true for numeric ordering comparisons
    pub fn is_ordering(&self) -> bool {
        matches!(self, Operator::Gt | Operator::Lt | Operator::Gte | Operator::Lte)
    }

    /// Returns true for operators whose expected value is a set
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::NotIn)
    }

    /// Returns true for the negated operators
    pub fn is_negated(&self) -> bool {
        matches!(self, Operator::Neq | Operator::NotContains | Operator::NotIn)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let op = match s.trim() {
            "eq" | "==" => Operator::Eq,
            "neq" | "ne" | "!=" => Operator::Neq,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            "gt" | ">" => Operator::Gt,
            "lt" | "<" => Operator::Lt,
            "gte" | "ge" | ">=" => Operator::Gte,
            "lte" | "le" | "<=" => Operator::Lte,
            "matches" | "=~" => Operator::Matches,
            "in" => Operator::In,
            "not_in" => Operator::NotIn,
            other => return Err(CoreError::UnknownOperator(other.to_string())),
        };
        Ok(op)
    }
}
