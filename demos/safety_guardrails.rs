//! Safety guardrails example
//!
//! This example demonstrates:
//! - Multi-domain evaluation (financial, medical, legal, crisis)
//! - The user-facing response that hides rule ids
//! - Overriding a decision through the audit trail

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdict_sdk::policies::{BundledPolicy, SafetySignals};
use verdict_sdk::{
    Action, DecisionRequest, EngineConfig, ExecutionMode, OverrideRequest, PolicyEngineBuilder,
};

fn init_tracing() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "verdict_sdk=info,verdict_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    println!("=== Safety Guardrails Example ===\n");

    let config = EngineConfig::load()?.with_execution_mode(ExecutionMode::Parallel);
    let engine = PolicyEngineBuilder::new()
        .with_config(config)
        .with_rule_set(BundledPolicy::Safety.rule_set()?)
        .publish_events(16)
        .build()
        .await?;

    let mut events = engine.subscribe();

    let turns = [
        SafetySignals::new("what's the capital of France")
            .with_intent("trivia")
            .vulnerable(false),
        SafetySignals::new("should I move my pension into crypto")
            .with_intent("crypto_speculation")
            .vulnerable(false),
        SafetySignals::new("I lost my job, should I take a payday loan")
            .with_intent("loan")
            .vulnerable(true),
        SafetySignals::new("I have chest pain and feel dizzy").vulnerable(false),
    ];

    let mut last_block = None;
    for signals in turns {
        let response = engine
            .decide(DecisionRequest::new(signals.to_context()).with_session("demo-session"))
            .await?;
        let user = response.user_response();

        println!("> {}", signals.message_text);
        println!("  Action: {}", user.action);
        if let Some(message) = &user.message {
            println!("  Message: {}", message);
        }
        if let Some(alternatives) = &user.alternatives {
            println!("  Alternatives: {}", alternatives);
        }
        println!();

        if let Some(rx) = events.as_mut() {
            if let Ok(event) = rx.try_recv() {
                println!("  [event] {} {:?}\n", event.final_action, event.primary_domain);
            }
        }

        if user.action == Action::Block {
            last_block = Some(response.decision_id);
        }
    }

    if let Some(decision_id) = last_block {
        let record = engine
            .override_decision(OverrideRequest::new(
                decision_id,
                Action::Restrict,
                "reviewer@example.com",
                "user confirmed they are only asking for general information",
            ))
            .await?;
        println!("Override recorded: {}", record.record_id);
        println!(
            "Effective action: {:?}",
            engine.effective_action(decision_id).await?
        );
    }

    Ok(())
}
