//! Governance rule inputs

use serde::{Deserialize, Serialize};
use verdict_core::EvaluationContext;

/// One change request under governance review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernanceItem {
    pub category: String,
    /// `low`, `medium`, `high` or `critical`
    pub severity: String,
    pub author_role: String,
}

impl GovernanceItem {
    pub fn new(
        category: impl Into<String>,
        severity: impl Into<String>,
        author_role: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            severity: severity.into(),
            author_role: author_role.into(),
        }
    }

    pub fn to_context(&self) -> EvaluationContext {
        EvaluationContext::new()
            .with("category", self.category.as_str())
            .with("severity", self.severity.as_str())
            .with("author_role", self.author_role.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::BundledPolicy;
    use verdict_core::Action;
    use verdict_runtime::PolicyEvaluator;

    fn action(item: GovernanceItem) -> Action {
        let rule_set = BundledPolicy::Governance.rule_set().unwrap();
        PolicyEvaluator::default()
            .evaluate_all(&rule_set, &item.to_context())
            .unwrap()
            .final_action()
    }

    #[test]
    fn test_critical_blocks_even_for_owners() {
        assert_eq!(action(GovernanceItem::new("docs", "critical", "owner")), Action::Block);
    }

    #[test]
    fn test_restricted_category_needs_review() {
        assert_eq!(
            action(GovernanceItem::new("billing", "low", "member")),
            Action::Redirect
        );
    }

    #[test]
    fn test_exempt_roles() {
        assert_eq!(action(GovernanceItem::new("billing", "high", "admin")), Action::Allow);
        assert_eq!(
            action(GovernanceItem::new("docs", "high", "member")),
            Action::Restrict
        );
    }
}
