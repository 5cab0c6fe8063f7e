//! Ready-made policies
//!
//! Auto-merge, safety and governance ship as YAML rule sets compiled into
//! the crate. Monetization readiness is an ordered gate built from a typed
//! [`MonetizationPolicy`] so its thresholds stay configurable.

pub mod automerge;
pub mod governance;
pub mod monetization;
pub mod safety;

pub use automerge::{AutoMergeVerdict, MergeCandidate};
pub use governance::GovernanceItem;
pub use monetization::{MonetizationPolicy, MonetizationSignals};
pub use safety::SafetySignals;

use crate::error::Result;
use verdict_core::RuleSet;
use verdict_parser::RuleSetParser;

/// Rule sets bundled with the SDK
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundledPolicy {
    AutoMerge,
    Safety,
    Governance,
}

impl BundledPolicy {
    pub const ALL: [BundledPolicy; 3] = [
        BundledPolicy::AutoMerge,
        BundledPolicy::Safety,
        BundledPolicy::Governance,
    ];

    /// Rule-set id declared in the document
    pub fn id(&self) -> &'static str {
        match self {
            BundledPolicy::AutoMerge => "automerge",
            BundledPolicy::Safety => "safety_guardrails",
            BundledPolicy::Governance => "governance",
        }
    }

    /// Raw YAML document
    pub fn content(&self) -> &'static str {
        match self {
            BundledPolicy::AutoMerge => include_str!("../../rulesets/automerge.yaml"),
            BundledPolicy::Safety => include_str!("../../rulesets/safety.yaml"),
            BundledPolicy::Governance => include_str!("../../rulesets/governance.yaml"),
        }
    }

    pub fn rule_set(&self) -> Result<RuleSet> {
        Ok(RuleSetParser::parse(self.content())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_rule_sets_load_without_faults() {
        for policy in BundledPolicy::ALL {
            let rule_set = policy.rule_set().unwrap();
            assert_eq!(rule_set.id(), policy.id());
            assert!(
                rule_set.faults().is_empty(),
                "{} has faults: {:?}",
                policy.id(),
                rule_set.faults()
            );
        }
    }

    #[test]
    fn test_safety_domains() {
        let rule_set = BundledPolicy::Safety.rule_set().unwrap();
        let domains: Vec<&str> = rule_set.domains().into_iter().collect();
        assert_eq!(domains, vec!["crisis", "financial", "legal", "medical"]);
    }
}
