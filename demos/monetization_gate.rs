//! Monetization readiness gate example
//!
//! This example demonstrates:
//! - Building an ordered gate from typed thresholds
//! - Short-circuit evaluation: checks after the first failure never run

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdict_sdk::policies::{MonetizationPolicy, MonetizationSignals};

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

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    println!("=== Monetization Gate Example ===\n");

    let policy = MonetizationPolicy::default().with_min_trust(0.4);
    println!("Policy: {}\n", serde_json::to_string(&policy)?);

    let cases = [
        (
            "ready",
            MonetizationSignals {
                readiness_score: 0.82,
                trust_score: Some(0.7),
                ..MonetizationSignals::default()
            },
        ),
        (
            "declined",
            MonetizationSignals {
                explicit_refusal: true,
                readiness_score: 0.95,
                ..MonetizationSignals::default()
            },
        ),
        (
            "blocked",
            MonetizationSignals {
                readiness_score: 0.7,
                blockers: vec!["unpaid_invoice".to_string()],
                trust_score: Some(0.9),
                ..MonetizationSignals::default()
            },
        ),
        (
            "unknown trust",
            MonetizationSignals {
                readiness_score: 0.9,
                ..MonetizationSignals::default()
            },
        ),
    ];

    for (name, signals) in cases {
        let outcome = policy.evaluate(&signals)?;
        println!("{}:", name);
        println!("  Passed: {}", outcome.passed);
        println!("  Evaluated: {}", outcome.evaluated_checks().join(" -> "));
        if let Some(check) = &outcome.blocking_check {
            println!("  Blocking check: {}", check);
            println!(
                "  Message: {}",
                outcome.message.as_deref().unwrap_or_default()
            );
        }
        println!();
    }

    Ok(())
}
