//! Policy evaluator
//!
//! Drives a full evaluation of one context against one rule-set snapshot:
//! hash the input, run the requested domains (sequentially or on scoped
//! threads) and aggregate. Both execution modes produce the same decision.

use super::aggregate::DecisionAggregator;
use super::domain::DomainEvaluator;
use super::gate::GateEvaluator;
use crate::error::{Result, RuntimeError};
use crate::result::{DomainResult, FinalDecision, GateOutcome};
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;
use verdict_core::{EvaluationContext, RuleSet};

/// How domain evaluators are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    /// One scoped thread per domain
    Parallel,
}

/// Evaluates contexts against rule-set snapshots
#[derive(Debug, Clone, Default)]
pub struct PolicyEvaluator {
    mode: ExecutionMode,
}

impl PolicyEvaluator {
    pub fn new(mode: ExecutionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Evaluate every domain of the rule set
    pub fn evaluate_all(
        &self,
        rule_set: &RuleSet,
        context: &EvaluationContext,
    ) -> Result<FinalDecision> {
        let domains: Vec<&str> = rule_set.domains().into_iter().collect();
        self.evaluate(rule_set, context, &domains)
    }

    /// Evaluate the named domains and aggregate their results
    ///
    /// Each domain name may be a rule domain or the id of an ordered gate;
    /// gates join the aggregation through their domain view.
    pub fn evaluate(
        &self,
        rule_set: &RuleSet,
        context: &EvaluationContext,
        domains: &[&str],
    ) -> Result<FinalDecision> {
        let started = Instant::now();

        if domains.is_empty() {
            return Err(RuntimeError::NoDomains);
        }
        for domain in domains {
            if !rule_set.has_domain(domain) && rule_set.gate(domain).is_none() {
                return Err(RuntimeError::UnknownDomain(domain.to_string()));
            }
        }

        let mut unique: Vec<&str> = domains.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let input_hash = context.input_hash()?;

        if let Some(schema) = rule_set.schema() {
            let violations = context.schema_violations(schema);
            if !violations.is_empty() {
                tracing::warn!(
                    "Context fields break the declared schema and stay unresolved: {}",
                    violations.join(", ")
                );
            }
        }

        let results = self.run_domains(&unique, |domain| {
            Self::evaluate_domain(rule_set, context, domain)
        })?;

        let mut decision =
            DecisionAggregator::aggregate(results, input_hash, rule_set.version().to_string());
        decision.set_duration_us(started.elapsed().as_micros() as u64);

        tracing::info!(
            "Decision {} (primary: {}) for input {} with rule set {}",
            decision.final_action(),
            decision.primary_domain().unwrap_or("-"),
            &decision.input_hash()[..12],
            decision.rule_version()
        );

        Ok(decision)
    }

    /// Evaluate one ordered gate on its own
    pub fn evaluate_gate(
        &self,
        rule_set: &RuleSet,
        context: &EvaluationContext,
        gate_id: &str,
    ) -> Result<GateOutcome> {
        let gate = rule_set
            .gate(gate_id)
            .ok_or_else(|| RuntimeError::UnknownGate(gate_id.to_string()))?;
        let outcome = GateEvaluator::evaluate(context, gate);
        tracing::info!(
            "Gate '{}' {} ({} checks evaluated)",
            gate_id,
            if outcome.passed { "passed" } else { "blocked" },
            outcome.checks.len()
        );
        Ok(outcome)
    }

    fn evaluate_domain(
        rule_set: &RuleSet,
        context: &EvaluationContext,
        domain: &str,
    ) -> DomainResult {
        match rule_set.gate(domain) {
            Some(gate) if rule_set.rules_for(domain).next().is_none() => {
                GateEvaluator::evaluate(context, gate).into_domain_result()
            }
            _ => DomainEvaluator::evaluate(context, rule_set, domain),
        }
    }

    /// Run `evaluate` once per domain in the configured mode
    ///
    /// A panicking domain evaluation is reported as
    /// [`RuntimeError::EvaluatorPanicked`] in both modes.
    fn run_domains<F>(&self, domains: &[&str], evaluate: F) -> Result<Vec<DomainResult>>
    where
        F: Fn(&str) -> DomainResult + Sync,
    {
        match self.mode {
            ExecutionMode::Sequential => domains
                .iter()
                .map(|&domain| {
                    panic::catch_unwind(AssertUnwindSafe(|| evaluate(domain)))
                        .map_err(|_| Self::panicked(domain))
                })
                .collect(),
            ExecutionMode::Parallel => std::thread::scope(|scope| {
                let evaluate = &evaluate;
                let handles: Vec<_> = domains
                    .iter()
                    .map(|&domain| (domain, scope.spawn(move || evaluate(domain))))
                    .collect();

                // Join every handle before short-circuiting on a panic
                let joined: Vec<Result<DomainResult>> = handles
                    .into_iter()
                    .map(|(domain, handle)| handle.join().map_err(|_| Self::panicked(domain)))
                    .collect();
                joined.into_iter().collect()
            }),
        }
    }

    fn panicked(domain: &str) -> RuntimeError {
        tracing::error!("Evaluator for domain '{}' panicked", domain);
        RuntimeError::EvaluatorPanicked(domain.to_string())
    }
}
