//! Final decision
//!
//! A `FinalDecision` is read-only apart from [`FinalDecision::tighten`]. There
//! is no way to make a decision more permissive once it has been produced;
//! that only happens through the audited override path, which records a new
//! audit entry instead of touching the decision.

use super::domain::DomainResult;
use crate::error::{Result, RuntimeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use verdict_core::{hashing, Action};

const UNAVAILABLE_CODE: &str = "DECISION_UNAVAILABLE";
const UNAVAILABLE_MESSAGE: &str = "Decision unavailable. Please try again later.";

/// Aggregate of every domain result for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalDecision {
    final_action: Action,

    #[serde(skip_serializing_if = "Option::is_none")]
    primary_domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    primary_rule: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    explanation_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    user_message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    alternatives: Option<String>,

    triggered_rules: Vec<String>,

    /// Domain results in canonical (domain name) order
    domain_results: Vec<DomainResult>,

    input_hash: String,
    rule_version: String,
    evaluated_at: DateTime<Utc>,
    duration_us: u64,
}

/// The deterministic part of a decision, used for the outcome fingerprint
#[derive(Serialize)]
struct Outcome<'a> {
    final_action: Action,
    primary_domain: Option<&'a str>,
    primary_rule: Option<&'a str>,
    explanation_code: Option<&'a str>,
    user_message: Option<&'a str>,
    alternatives: Option<&'a str>,
    triggered_rules: &'a [String],
    domain_results: &'a [DomainResult],
    input_hash: &'a str,
    rule_version: &'a str,
}

impl FinalDecision {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        final_action: Action,
        primary: Option<&DomainResult>,
        triggered_rules: Vec<String>,
        domain_results: Vec<DomainResult>,
        input_hash: String,
        rule_version: String,
        evaluated_at: DateTime<Utc>,
    ) -> Self {
        let (primary_domain, primary_rule, explanation_code, user_message, alternatives) =
            match primary {
                Some(p) => (
                    Some(p.domain.clone()),
                    p.winning_rule.clone(),
                    p.explanation_code.clone(),
                    p.message.clone(),
                    p.alternatives.clone(),
                ),
                None => (None, None, None, None, None),
            };

        Self {
            final_action,
            primary_domain,
            primary_rule,
            explanation_code,
            user_message,
            alternatives,
            triggered_rules,
            domain_results,
            input_hash,
            rule_version,
            evaluated_at,
            duration_us: 0,
        }
    }

    pub(crate) fn set_duration_us(&mut self, duration_us: u64) {
        self.duration_us = duration_us;
    }

    /// Generic `block` used when the engine itself failed
    ///
    /// Carries no domain results, rule ids or traces.
    pub fn unavailable(input_hash: impl Into<String>, rule_version: impl Into<String>) -> Self {
        Self {
            final_action: Action::Block,
            primary_domain: None,
            primary_rule: None,
            explanation_code: Some(UNAVAILABLE_CODE.to_string()),
            user_message: Some(UNAVAILABLE_MESSAGE.to_string()),
            alternatives: None,
            triggered_rules: Vec::new(),
            domain_results: Vec::new(),
            input_hash: input_hash.into(),
            rule_version: rule_version.into(),
            evaluated_at: Utc::now(),
            duration_us: 0,
        }
    }

    /// Whether this is the generic engine-failure decision
    pub fn is_unavailable(&self) -> bool {
        self.explanation_code.as_deref() == Some(UNAVAILABLE_CODE) && self.domain_results.is_empty()
    }

    pub fn final_action(&self) -> Action {
        self.final_action
    }

    /// Domain that produced the final action; `None` for `allow`
    pub fn primary_domain(&self) -> Option<&str> {
        self.primary_domain.as_deref()
    }

    pub fn primary_rule(&self) -> Option<&str> {
        self.primary_rule.as_deref()
    }

    pub fn explanation_code(&self) -> Option<&str> {
        self.explanation_code.as_deref()
    }

    /// Message template of the winning rule, verbatim
    pub fn user_message(&self) -> Option<&str> {
        self.user_message.as_deref()
    }

    pub fn alternatives(&self) -> Option<&str> {
        self.alternatives.as_deref()
    }

    /// Triggered rule ids across all domains
    pub fn triggered_rules(&self) -> &[String] {
        &self.triggered_rules
    }

    pub fn domain_results(&self) -> &[DomainResult] {
        &self.domain_results
    }

    pub fn domain_result(&self, domain: &str) -> Option<&DomainResult> {
        self.domain_results.iter().find(|r| r.domain == domain)
    }

    pub fn input_hash(&self) -> &str {
        &self.input_hash
    }

    pub fn rule_version(&self) -> &str {
        &self.rule_version
    }

    pub fn evaluated_at(&self) -> DateTime<Utc> {
        self.evaluated_at
    }

    pub fn duration_us(&self) -> u64 {
        self.duration_us
    }

    pub fn is_allowed(&self) -> bool {
        self.final_action == Action::Allow
    }

    /// Make the decision at least as restrictive as `action`
    ///
    /// Tightening to the current action is a no-op. Asking for a more
    /// permissive action fails with [`RuntimeError::OverrideWithoutAudit`].
    pub fn tighten(&mut self, action: Action, message: Option<String>) -> Result<()> {
        if action > self.final_action {
            return Err(RuntimeError::OverrideWithoutAudit {
                from: self.final_action,
                to: action,
            });
        }
        if action < self.final_action {
            tracing::debug!("Tightening decision from {} to {}", self.final_action, action);
            self.final_action = action;
            if message.is_some() {
                self.user_message = message;
            }
        }
        Ok(())
    }

    /// SHA-256 over every field except timestamp and duration
    ///
    /// Two evaluations of the same context against the same rule-set version
    /// produce the same fingerprint.
    pub fn outcome_fingerprint(&self) -> Result<String> {
        let outcome = Outcome {
            final_action: self.final_action,
            primary_domain: self.primary_domain.as_deref(),
            primary_rule: self.primary_rule.as_deref(),
            explanation_code: self.explanation_code.as_deref(),
            user_message: self.user_message.as_deref(),
            alternatives: self.alternatives.as_deref(),
            triggered_rules: &self.triggered_rules,
            domain_results: &self.domain_results,
            input_hash: &self.input_hash,
            rule_version: &self.rule_version,
        };
        Ok(hashing::digest(&outcome)?)
    }
}
