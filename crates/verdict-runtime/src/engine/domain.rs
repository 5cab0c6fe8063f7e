//! Domain evaluation
//!
//! Runs every active rule of one domain and reduces the matches to a single
//! action. A domain only ever reads the context and its own rules, never
//! another domain's result, so domains can be evaluated in any order or in
//! parallel.

use super::rule::RuleEvaluator;
use crate::result::{Diagnostic, DiagnosticKind, DomainResult};
use verdict_core::{Action, EvaluationContext, FaultKind, Rule, RuleSet, Severity};

/// A rule that contributes to the domain's action
struct Candidate<'a> {
    rule: &'a Rule,
    action: Action,
    confidence: f64,
}

impl Candidate<'_> {
    fn key(&self) -> (Action, i32, &str) {
        (self.action, self.rule.priority, self.rule.id.as_str())
    }
}

/// Evaluates all rules of one domain
pub struct DomainEvaluator;

impl DomainEvaluator {
    /// Evaluate `domain` of `rule_set` against `context`
    ///
    /// The domain's action is the most restrictive among matched rules, with
    /// ties broken by lowest priority and then rule id. A hard rule that
    /// cannot be resolved fails closed: it contributes the domain's most
    /// restrictive configured action instead of being treated as a miss.
    pub fn evaluate(
        context: &EvaluationContext,
        rule_set: &RuleSet,
        domain: &str,
    ) -> DomainResult {
        let mut result = DomainResult::allow(domain);

        for fault in rule_set
            .faults_for(domain)
            .filter(|f| f.kind != FaultKind::MalformedCheck)
        {
            result.diagnostics.push(Diagnostic::new(
                DiagnosticKind::RuleSkipped,
                &fault.rule_id,
                &fault.reason,
            ));
        }

        let fail_closed_action = rule_set.most_restrictive_action(domain);
        let mut candidates = Vec::new();

        for rule in rule_set.rules_for(domain) {
            let Some(verdict) = RuleEvaluator::evaluate(context, rule) else {
                continue;
            };

            if verdict.matched {
                candidates.push(Candidate {
                    rule,
                    action: rule.action,
                    confidence: rule.confidence,
                });
            } else if verdict.unresolved && rule.severity == Severity::Hard {
                let missing = verdict.trace.missing_fields().join(", ");
                tracing::warn!(
                    "Hard rule '{}' missing required input ({}); domain '{}' fails closed to {}",
                    rule.id,
                    missing,
                    domain,
                    fail_closed_action
                );
                result.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MissingRequiredInput,
                    &rule.id,
                    format!("missing: {}", missing),
                ));
                candidates.push(Candidate {
                    rule,
                    action: fail_closed_action,
                    confidence: 0.0,
                });
            }

            result.traces.push(verdict.trace);
        }

        result.triggered_rules = candidates.iter().map(|c| c.rule.id.clone()).collect();

        if let Some(winner) = candidates.iter().min_by(|a, b| a.key().cmp(&b.key())) {
            result.action = winner.action;
            result.winning_rule = Some(winner.rule.id.clone());
            result.winning_priority = Some(winner.rule.priority);
            result.explanation_code = Some(winner.rule.explanation_code().to_string());
            result.message = Some(winner.rule.message.clone()).filter(|m| !m.is_empty());
            result.alternatives = winner.rule.alternatives.clone();
            result.confidence = winner.confidence;
        }

        tracing::debug!(
            "Domain '{}' -> {} ({} triggered, {} diagnostics)",
            domain,
            result.action,
            result.triggered_rules.len(),
            result.diagnostics.len()
        );

        result
    }
}
