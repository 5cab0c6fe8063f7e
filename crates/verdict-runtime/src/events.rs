//! Downstream decision events
//!
//! Events carry only derived fields of a decision. Raw context values, user
//! messages and traces stay in the audit record.

use crate::audit::CausalRef;
use crate::error::Result;
use crate::result::FinalDecision;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;
use verdict_core::Action;

/// Redacted notification of one decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub decision_id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    pub final_action: Action,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_domain: Option<String>,

    pub triggered_rules: Vec<String>,
    pub input_hash: String,
    pub rule_version: String,
    pub occurred_at: DateTime<Utc>,
}

impl DecisionEvent {
    pub fn from_decision(decision_id: Uuid, causal: &CausalRef, decision: &FinalDecision) -> Self {
        Self {
            decision_id,
            tenant_id: causal.tenant_id.clone(),
            session_id: causal.session_id.clone(),
            final_action: decision.final_action(),
            primary_domain: decision.primary_domain().map(str::to_string),
            triggered_rules: decision.triggered_rules().to_vec(),
            input_hash: decision.input_hash().to_string(),
            rule_version: decision.rule_version().to_string(),
            occurred_at: decision.evaluated_at(),
        }
    }
}

/// Destination for decision events
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DecisionEvent) -> Result<()>;
}

/// Publisher that drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

#[async_trait]
impl EventPublisher for NoopPublisher {
    async fn publish(&self, _event: DecisionEvent) -> Result<()> {
        Ok(())
    }
}

/// In-process fan-out over a tokio broadcast channel
///
/// Publishing with no subscribers is not an error; the event is dropped.
#[derive(Debug, Clone)]
pub struct BroadcastPublisher {
    sender: broadcast::Sender<DecisionEvent>,
}

impl BroadcastPublisher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DecisionEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl EventPublisher for BroadcastPublisher {
    async fn publish(&self, event: DecisionEvent) -> Result<()> {
        match self.sender.send(event) {
            Ok(receivers) => {
                tracing::debug!("Decision event delivered to {} subscribers", receivers)
            }
            Err(broadcast::error::SendError(event)) => {
                tracing::debug!(
                    "No subscribers for decision event {}; dropped",
                    event.decision_id
                )
            }
        }
        Ok(())
    }
}
