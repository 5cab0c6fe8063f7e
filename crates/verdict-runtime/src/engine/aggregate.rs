//! Decision aggregation
//!
//! Combines domain results into one [`FinalDecision`]. The final action is
//! the minimum of the domain actions under `block < redirect < restrict <
//! allow`. Results are put into canonical (domain name) order first, so the
//! decision does not depend on the order domains were evaluated in.

use crate::result::{DomainResult, FinalDecision};
use chrono::Utc;
use verdict_core::Action;

/// Merges domain results into a final decision
pub struct DecisionAggregator;

impl DecisionAggregator {
    /// Aggregate domain results
    ///
    /// The primary domain is the one whose winning rule has the lowest
    /// priority (then lowest rule id, then domain name) among the domains
    /// that reached the final action. An `allow` decision has no primary
    /// domain. An empty input aggregates to `allow`.
    pub fn aggregate(
        mut results: Vec<DomainResult>,
        input_hash: String,
        rule_version: String,
    ) -> FinalDecision {
        results.sort_by(|a, b| a.domain.cmp(&b.domain));

        let final_action = Action::most_restrictive(results.iter().map(|r| r.action))
            .unwrap_or(Action::Allow);

        let primary_index = if final_action == Action::Allow {
            None
        } else {
            results
                .iter()
                .enumerate()
                .filter(|(_, r)| r.action == final_action)
                .min_by(|(_, a), (_, b)| a.rank().cmp(&b.rank()))
                .map(|(index, _)| index)
        };

        let triggered_rules = results
            .iter()
            .flat_map(|r| r.triggered_rules.iter().cloned())
            .collect();

        tracing::debug!(
            "Aggregated {} domains -> {} (primary: {:?})",
            results.len(),
            final_action,
            primary_index.map(|i| results[i].domain.as_str())
        );

        let primary = primary_index.map(|i| results[i].clone());
        FinalDecision::new(
            final_action,
            primary.as_ref(),
            triggered_rules,
            results,
            input_hash,
            rule_version,
            Utc::now(),
        )
    }
}
