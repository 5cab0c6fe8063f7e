//! Auto-merge eligibility

use crate::types::DecisionResponse;
use serde::{Deserialize, Serialize};
use verdict_core::{EvaluationContext, RuleSet};
use verdict_runtime::FinalDecision;

/// Facts about one pull request
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MergeCandidate {
    pub changed_files: Vec<String>,
    pub diff: String,
    /// `success` when CI passed; missing status fails closed
    pub ci_status: Option<String>,
    /// `passed` when the validator passed; missing status fails closed
    pub validator_status: Option<String>,
    pub lines_changed: u64,
    pub risk_level: Option<String>,
}

impl MergeCandidate {
    pub fn to_context(&self) -> EvaluationContext {
        let mut ctx = EvaluationContext::new()
            .with("changed_files", self.changed_files.clone())
            .with("diff", self.diff.as_str())
            .with("lines_changed", self.lines_changed as f64);
        ctx.insert("ci_status", self.ci_status.clone());
        ctx.insert("validator_status", self.validator_status.clone());
        ctx.insert("risk_level", self.risk_level.clone());
        ctx
    }
}

impl From<&MergeCandidate> for EvaluationContext {
    fn from(candidate: &MergeCandidate) -> Self {
        candidate.to_context()
    }
}

/// Outcome of an auto-merge evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutoMergeVerdict {
    pub eligible: bool,
    /// Explanation codes of every triggered rule
    pub blocked_reasons: Vec<String>,
    pub decision: FinalDecision,
}

impl AutoMergeVerdict {
    /// Derive the verdict from a decision made against `rule_set`
    pub fn from_decision(rule_set: &RuleSet, decision: FinalDecision) -> Self {
        let mut blocked_reasons: Vec<String> = Vec::new();
        for rule_id in decision.triggered_rules() {
            let code = rule_set
                .rule(rule_id)
                .map(|r| r.explanation_code().to_string())
                .unwrap_or_else(|| rule_id.clone());
            if !blocked_reasons.contains(&code) {
                blocked_reasons.push(code);
            }
        }
        if decision.is_unavailable() {
            blocked_reasons.extend(decision.explanation_code().map(str::to_string));
        }

        Self {
            eligible: decision.is_allowed(),
            blocked_reasons,
            decision,
        }
    }

    pub fn from_response(rule_set: &RuleSet, response: DecisionResponse) -> Self {
        Self::from_decision(rule_set, response.decision)
    }
}
