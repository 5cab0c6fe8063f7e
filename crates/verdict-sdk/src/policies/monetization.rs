//! Monetization readiness gate
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. `explicit_refusal`: the user has not declined
//! 2. `readiness_threshold`: readiness score at or above the threshold
//! 3. `no_blockers`: no open blockers
//! 4. `social_pressure_ceiling`: social pressure at or below the ceiling
//! 5. `trust_floor`: trust score at or above the floor (only when configured)

use crate::error::Result;
use serde::{Deserialize, Serialize};
use verdict_core::{Condition, EvaluationContext, GateCheck, Operator, OrderedGate, RuleSet};
use verdict_runtime::{GateOutcome, PolicyEvaluator};

/// Thresholds of the monetization gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonetizationPolicy {
    pub readiness_threshold: f64,
    pub max_social_pressure: f64,
    pub min_trust: Option<f64>,
}

impl Default for MonetizationPolicy {
    fn default() -> Self {
        Self {
            readiness_threshold: 0.6,
            max_social_pressure: 0.7,
            min_trust: None,
        }
    }
}

impl MonetizationPolicy {
    pub const GATE_ID: &'static str = "monetization_readiness";

    pub fn with_readiness_threshold(mut self, threshold: f64) -> Self {
        self.readiness_threshold = threshold;
        self
    }

    pub fn with_max_social_pressure(mut self, ceiling: f64) -> Self {
        self.max_social_pressure = ceiling;
        self
    }

    pub fn with_min_trust(mut self, floor: f64) -> Self {
        self.min_trust = Some(floor);
        self
    }

    /// The ordered gate for these thresholds
    pub fn gate(&self) -> OrderedGate {
        let mut gate = OrderedGate::new(Self::GATE_ID)
            .with_domain("monetization")
            .check(
                GateCheck::new("explicit_refusal")
                    .with_code("USER_DECLINED")
                    .with_message("The user has declined offers.")
                    .require(Condition::new("explicit_refusal", Operator::Eq, false)),
            )
            .check(
                GateCheck::new("readiness_threshold")
                    .with_code("READINESS_LOW")
                    .with_message("It's not the right moment for an offer yet.")
                    .require(Condition::new(
                        "readiness_score",
                        Operator::Gte,
                        self.readiness_threshold,
                    )),
            )
            .check(
                GateCheck::new("no_blockers")
                    .with_code("BLOCKERS_PRESENT")
                    .with_message("Open issues need to be resolved first.")
                    .require(Condition::new("blocker_count", Operator::Eq, 0)),
            )
            .check(
                GateCheck::new("social_pressure_ceiling")
                    .with_code("SOCIAL_PRESSURE_HIGH")
                    .with_message("An offer now would add too much pressure.")
                    .require(Condition::new(
                        "social_pressure",
                        Operator::Lte,
                        self.max_social_pressure,
                    )),
            );

        if let Some(floor) = self.min_trust {
            gate = gate.check(
                GateCheck::new("trust_floor")
                    .with_code("TRUST_LOW")
                    .with_message("More trust is needed before making an offer.")
                    .require(Condition::new("trust_score", Operator::Gte, floor)),
            );
        }

        gate
    }

    /// A rule set holding only this gate
    pub fn rule_set(&self) -> Result<RuleSet> {
        Ok(RuleSet::builder("monetization")
            .label("1")
            .gate(self.gate())
            .build()?)
    }

    /// Evaluate the gate for one set of signals
    pub fn evaluate(&self, signals: &MonetizationSignals) -> Result<GateOutcome> {
        let rule_set = self.rule_set()?;
        Ok(PolicyEvaluator::default().evaluate_gate(
            &rule_set,
            &signals.to_context(),
            Self::GATE_ID,
        )?)
    }
}

/// Signals the monetization gate reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonetizationSignals {
    pub explicit_refusal: bool,
    pub readiness_score: f64,
    #[serde(default)]
    pub blockers: Vec<String>,
    /// Treated as 0.0 when unknown
    pub social_pressure: Option<f64>,
    /// Left out of the context when unknown, so a configured trust floor fails
    pub trust_score: Option<f64>,
}

impl MonetizationSignals {
    pub fn to_context(&self) -> EvaluationContext {
        let mut ctx = EvaluationContext::new()
            .with("explicit_refusal", self.explicit_refusal)
            .with("readiness_score", self.readiness_score)
            .with("blocker_count", self.blockers.len())
            .with("blockers", self.blockers.clone())
            .with("social_pressure", self.social_pressure.unwrap_or(0.0));
        if let Some(trust) = self.trust_score {
            ctx.insert("trust_score", trust);
        }
        ctx
    }
}
