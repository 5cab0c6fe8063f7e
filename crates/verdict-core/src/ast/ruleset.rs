//! Rule set definitions
//!
//! A rule set is the unit of versioning: rules, ordered gates, lookup tables
//! and the optional context schema are loaded, validated and fingerprinted
//! together. `version()` combines the declared label with a digest of the
//! whole content, so changing any rule, table entry or gate check yields a
//! new version.
//!
//! Rules that fail validation are not repaired. They are removed from the
//! evaluable set and recorded as faults; evaluators report them as skipped.

use super::{Action, OrderedGate, Rule};
use crate::error::{CoreError, Result};
use crate::hashing;
use crate::types::{Schema, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Why a rule was taken out of evaluation at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    UnknownOperator,
    MalformedRule,
    /// A gate check; it stays in its gate and fails closed
    MalformedCheck,
}

/// A rule (or gate check) that failed load-time validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleFault {
    pub rule_id: String,
    /// Domain of the rule, when it could be determined
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    pub kind: FaultKind,
    pub reason: String,
}

impl RuleFault {
    pub fn malformed(
        rule_id: impl Into<String>,
        domain: Option<String>,
        reason: impl Into<String>,
    ) -> Self {
        RuleFault {
            rule_id: rule_id.into(),
            domain,
            kind: FaultKind::MalformedRule,
            reason: reason.into(),
        }
    }

    pub fn unknown_operator(
        rule_id: impl Into<String>,
        domain: Option<String>,
        operator: &str,
    ) -> Self {
        RuleFault {
            rule_id: rule_id.into(),
            domain,
            kind: FaultKind::UnknownOperator,
            reason: format!("unknown operator '{}'", operator),
        }
    }

    pub fn malformed_check(gate: &OrderedGate, check: &str, reason: impl Into<String>) -> Self {
        RuleFault {
            rule_id: format!("{}.{}", gate.id, check),
            domain: Some(gate.domain().to_string()),
            kind: FaultKind::MalformedCheck,
            reason: reason.into(),
        }
    }
}

/// Validated, immutable, versioned rule set
#[derive(Debug, Clone, Serialize)]
pub struct RuleSet {
    id: String,
    label: String,
    version: String,
    rules: Vec<Rule>,
    gates: Vec<OrderedGate>,
    tables: BTreeMap<String, Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    schema: Option<Schema>,
    faults: Vec<RuleFault>,
}

impl RuleSet {
    /// Start building a rule set
    pub fn builder(id: impl Into<String>) -> RuleSetBuilder {
        RuleSetBuilder::new(id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Declared version label
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Content-derived rule-set version (`label+digest`)
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Valid rules in (priority, id) order, active and inactive
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// Valid rules of one domain in (priority, id) order
    pub fn rules_for<'a>(&'a self, domain: &'a str) -> impl Iterator<Item = &'a Rule> + 'a {
        self.rules.iter().filter(move |r| r.domain == domain)
    }

    /// Every domain named by a rule or a faulted rule (gate checks excluded)
    pub fn domains(&self) -> BTreeSet<&str> {
        self.rules
            .iter()
            .map(|r| r.domain.as_str())
            .chain(
                self.faults
                    .iter()
                    .filter(|f| f.kind != FaultKind::MalformedCheck)
                    .filter_map(|f| f.domain.as_deref()),
            )
            .collect()
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.domains().contains(domain)
    }

    /// Most restrictive action configured by the domain's active rules
    ///
    /// Used as the fail-closed outcome when required input is missing.
    pub fn most_restrictive_action(&self, domain: &str) -> Action {
        Action::most_restrictive(self.rules_for(domain).filter(|r| r.active).map(|r| r.action))
            .unwrap_or(Action::Block)
    }

    pub fn gates(&self) -> &[OrderedGate] {
        &self.gates
    }

    pub fn gate(&self, id: &str) -> Option<&OrderedGate> {
        self.gates.iter().find(|g| g.id == id)
    }

    pub fn tables(&self) -> &BTreeMap<String, Vec<Value>> {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&[Value]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    pub fn schema(&self) -> Option<&Schema> {
        self.schema.as_ref()
    }

    /// Rules and gate checks rejected at load time
    pub fn faults(&self) -> &[RuleFault] {
        &self.faults
    }

    pub fn faults_for<'a>(&'a self, domain: &'a str) -> impl Iterator<Item = &'a RuleFault> + 'a {
        self.faults
            .iter()
            .filter(move |f| f.domain.as_deref() == Some(domain))
    }
}

/// Builder that validates rules and fingerprints the result
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    id: String,
    label: String,
    rules: Vec<Rule>,
    gates: Vec<OrderedGate>,
    tables: BTreeMap<String, Vec<Value>>,
    schema: Option<Schema>,
    faults: Vec<RuleFault>,
}

impl RuleSetBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        RuleSetBuilder {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Declared version label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules<I: IntoIterator<Item = Rule>>(mut self, rules: I) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn gate(mut self, gate: OrderedGate) -> Self {
        self.gates.push(gate);
        self
    }

    pub fn table(mut self, name: impl Into<String>, values: Vec<Value>) -> Self {
        self.tables.insert(name.into(), values);
        self
    }

    pub fn schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Record a fault found before the rule could be constructed (e.g. by a parser)
    pub fn fault(mut self, fault: RuleFault) -> Self {
        self.faults.push(fault);
        self
    }

    /// Validate every rule and gate, then compute the version
    ///
    /// # Errors
    ///
    /// Fails only on set-level problems (empty id, duplicate gate ids).
    /// Individual malformed rules become faults instead.
    pub fn build(self) -> Result<RuleSet> {
        let RuleSetBuilder {
            id,
            label,
            rules,
            mut gates,
            tables,
            schema,
            mut faults,
        } = self;

        if id.trim().is_empty() {
            return Err(CoreError::InvalidRuleSet("rule set id cannot be empty".to_string()));
        }

        let mut seen = BTreeSet::new();
        for gate in &gates {
            if !seen.insert(gate.id.clone()) {
                return Err(CoreError::DuplicateId(format!("gate '{}'", gate.id)));
            }
        }

        let mut valid = Vec::with_capacity(rules.len());
        let mut rule_ids = BTreeSet::new();
        for mut rule in rules {
            let domain = Some(rule.domain.clone()).filter(|d| !d.trim().is_empty());
            if !rule_ids.insert(rule.id.clone()) {
                tracing::warn!("Skipping rule '{}': duplicate rule id", rule.id);
                faults.push(RuleFault::malformed(&rule.id, domain, "duplicate rule id"));
                continue;
            }
            match rule.compile(&tables, schema.as_ref()) {
                Ok(()) => valid.push(rule),
                Err(reason) => {
                    tracing::warn!("Skipping malformed rule '{}': {}", rule.id, reason);
                    faults.push(RuleFault::malformed(&rule.id, domain, reason));
                }
            }
        }
        valid.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));

        for gate in &mut gates {
            for (check, reason) in gate.compile(&tables, schema.as_ref()) {
                tracing::warn!(
                    "Gate '{}' check '{}' is malformed and will fail closed: {}",
                    gate.id,
                    check,
                    reason
                );
                faults.push(RuleFault::malformed_check(gate, &check, reason));
            }
        }

        faults.sort_by(|a, b| a.rule_id.cmp(&b.rule_id));

        let digest = hashing::digest(&Fingerprint {
            id: &id,
            label: &label,
            rules: &valid,
            gates: &gates,
            tables: &tables,
            schema: schema.as_ref(),
            faults: &faults,
        })?;
        let version = if label.is_empty() {
            digest[..16].to_string()
        } else {
            format!("{}+{}", label, &digest[..16])
        };

        tracing::debug!(
            "Built rule set '{}' version {} ({} rules, {} gates, {} faults)",
            id,
            version,
            valid.len(),
            gates.len(),
            faults.len()
        );

        Ok(RuleSet {
            id,
            label,
            version,
            rules: valid,
            gates,
            tables,
            schema,
            faults,
        })
    }
}

#[derive(Serialize)]
struct Fingerprint<'a> {
    id: &'a str,
    label: &'a str,
    rules: &'a [Rule],
    gates: &'a [OrderedGate],
    tables: &'a BTreeMap<String, Vec<Value>>,
    schema: Option<&'a Schema>,
    faults: &'a [RuleFault],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Condition, GateCheck, Operator};

    fn block_rule(id: &str, domain: &str, priority: i32) -> Rule {
        Rule::new(id, domain, Action::Block)
            .with_priority(priority)
            .with_message("blocked")
            .when(Condition::new("flag", Operator::Eq, true))
    }

    #[test]
    fn test_build_sorts_rules_by_priority_then_id() {
        let set = RuleSet::builder("s")
            .rule(block_rule("b", "d", 5))
            .rule(block_rule("a", "d", 5))
            .rule(block_rule("c", "d", 1))
            .build()
            .unwrap();

        let ids: Vec<&str> = set.rules().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_malformed_rule_becomes_fault() {
        let bad = Rule::new("bad", "financial", Action::Block)
            .with_message("x")
            .when(Condition::new("score", Operator::Gt, "high"));
        let set = RuleSet::builder("s")
            .rule(block_rule("good", "financial", 1))
            .rule(bad)
            .build()
            .unwrap();

        assert_eq!(set.rules().len(), 1);
        assert_eq!(set.faults().len(), 1);
        assert_eq!(set.faults()[0].kind, FaultKind::MalformedRule);
        assert_eq!(set.faults_for("financial").count(), 1);
    }

    #[test]
    fn test_duplicate_rule_id_is_faulted() {
        let set = RuleSet::builder("s")
            .rule(block_rule("dup", "d", 1))
            .rule(block_rule("dup", "d", 2))
            .build()
            .unwrap();

        assert_eq!(set.rules().len(), 1);
        assert_eq!(set.rules()[0].priority, 1);
        assert_eq!(set.faults()[0].reason, "duplicate rule id");
    }

    #[test]
    fn test_duplicate_gate_id_is_an_error() {
        let result = RuleSet::builder("s")
            .gate(OrderedGate::new("g"))
            .gate(OrderedGate::new("g"))
            .build();
        assert!(matches!(result, Err(CoreError::DuplicateId(_))));
    }

    #[test]
    fn test_version_changes_with_any_content_change() {
        let base = RuleSet::builder("s")
            .label("2024.1")
            .rule(block_rule("r", "d", 1))
            .table("keywords", vec![Value::from("a")])
            .build()
            .unwrap();
        let same = RuleSet::builder("s")
            .label("2024.1")
            .rule(block_rule("r", "d", 1))
            .table("keywords", vec![Value::from("a")])
            .build()
            .unwrap();
        let table_changed = RuleSet::builder("s")
            .label("2024.1")
            .rule(block_rule("r", "d", 1))
            .table("keywords", vec![Value::from("a"), Value::from("b")])
            .build()
            .unwrap();
        let rule_changed = RuleSet::builder("s")
            .label("2024.1")
            .rule(block_rule("r", "d", 2))
            .table("keywords", vec![Value::from("a")])
            .build()
            .unwrap();

        assert!(base.version().starts_with("2024.1+"));
        assert_eq!(base.version(), same.version());
        assert_ne!(base.version(), table_changed.version());
        assert_ne!(base.version(), rule_changed.version());
    }

    #[test]
    fn test_most_restrictive_action_of_domain() {
        let restrict = Rule::new("r", "d", Action::Restrict)
            .with_message("m")
            .when(Condition::new("x", Operator::Eq, 1.0));
        let redirect = Rule::new("q", "d", Action::Redirect)
            .with_message("m")
            .when(Condition::new("x", Operator::Eq, 2.0));
        let set = RuleSet::builder("s").rule(restrict).rule(redirect).build().unwrap();

        assert_eq!(set.most_restrictive_action("d"), Action::Redirect);
        assert_eq!(set.most_restrictive_action("unknown"), Action::Block);
    }

    #[test]
    fn test_faulted_gate_check_recorded() {
        let gate = OrderedGate::new("g").check(GateCheck::new("c").with_message("m"));
        let set = RuleSet::builder("s").gate(gate).build().unwrap();

        assert_eq!(set.faults()[0].rule_id, "g.c");
        assert_eq!(set.faults()[0].kind, FaultKind::MalformedCheck);
        assert!(set.gate("g").unwrap().checks[0].fault().is_some());
        assert!(!set.has_domain("g"));
    }
}
