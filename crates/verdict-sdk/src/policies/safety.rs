//! Safety guardrail signals

use serde::{Deserialize, Serialize};
use verdict_core::EvaluationContext;

/// Classifier output for one conversational turn
///
/// Produced upstream (e.g. by an intent classifier); the engine only
/// compares the values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SafetySignals {
    pub intent: Option<String>,
    /// Required by the financial domain; absent fails closed
    pub emotional_vulnerability: Option<bool>,
    pub message_text: String,
}

impl SafetySignals {
    pub fn new(message_text: impl Into<String>) -> Self {
        Self {
            message_text: message_text.into(),
            ..Self::default()
        }
    }

    pub fn with_intent(mut self, intent: impl Into<String>) -> Self {
        self.intent = Some(intent.into());
        self
    }

    pub fn vulnerable(mut self, vulnerable: bool) -> Self {
        self.emotional_vulnerability = Some(vulnerable);
        self
    }

    pub fn to_context(&self) -> EvaluationContext {
        let mut ctx = EvaluationContext::new().with("message_text", self.message_text.as_str());
        ctx.insert("intent", self.intent.clone());
        ctx.insert("emotional_vulnerability", self.emotional_vulnerability);
        ctx
    }
}
