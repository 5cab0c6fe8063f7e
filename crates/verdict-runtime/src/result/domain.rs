//! Per-domain evaluation result

use super::trace::RuleTrace;
use serde::{Deserialize, Serialize};
use verdict_core::Action;

/// Kind of a non-fatal evaluation diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A rule of the domain was rejected at load time and not evaluated
    RuleSkipped,
    /// A hard rule could not be resolved and the domain failed closed
    MissingRequiredInput,
    /// A gate check was malformed and failed closed
    MalformedCheck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Rule (or `gate.check`) the diagnostic is about
    pub rule_id: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        rule_id: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            rule_id: rule_id.into(),
            detail: detail.into(),
        }
    }
}

/// Result of evaluating one domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainResult {
    pub domain: String,

    /// Most restrictive action among triggered rules; `allow` when none triggered
    pub action: Action,

    /// Triggered rule ids in evaluation order
    pub triggered_rules: Vec<String>,

    /// Rule that decided the domain's action
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_rule: Option<String>,

    /// Priority of the winning rule, used for cross-domain tie-breaks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_priority: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation_code: Option<String>,

    /// Message template of the winning rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub alternatives: Option<String>,

    pub confidence: f64,

    /// One trace per active rule evaluated
    pub traces: Vec<RuleTrace>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl DomainResult {
    /// A domain with no triggered rules
    pub fn allow(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            action: Action::Allow,
            triggered_rules: Vec::new(),
            winning_rule: None,
            winning_priority: None,
            explanation_code: None,
            message: None,
            alternatives: None,
            confidence: 1.0,
            traces: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_triggered(&self) -> bool {
        !self.triggered_rules.is_empty()
    }

    pub fn has_diagnostic(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    /// Cross-domain ordering key: action, then winning rule priority, rule id, domain
    pub(crate) fn rank(&self) -> (Action, i32, &str, &str) {
        (
            self.action,
            self.winning_priority.unwrap_or(i32::MAX),
            self.winning_rule.as_deref().unwrap_or(""),
            self.domain.as_str(),
        )
    }
}
