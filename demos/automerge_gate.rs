//! Auto-merge gate example
//!
//! This example demonstrates:
//! - Building a PolicyEngine from the bundled auto-merge rule set
//! - Deciding eligibility for a few pull requests
//! - Reading blocked reasons from the decision

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verdict_sdk::policies::{AutoMergeVerdict, BundledPolicy, MergeCandidate};
use verdict_sdk::{DecisionRequest, PolicyEngineBuilder};

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

fn candidate(files: &[&str], diff: &str, ci: &str, lines: u64) -> MergeCandidate {
    MergeCandidate {
        changed_files: files.iter().map(|f| f.to_string()).collect(),
        diff: diff.to_string(),
        ci_status: Some(ci.to_string()),
        validator_status: Some("passed".to_string()),
        lines_changed: lines,
        risk_level: Some("low".to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    println!("=== Auto-merge Gate Example ===\n");

    let rule_set = BundledPolicy::AutoMerge.rule_set()?;
    let engine = PolicyEngineBuilder::new()
        .with_rule_set(rule_set.clone())
        .build()
        .await?;

    println!("Rule set version: {}\n", engine.rule_version());

    let candidates = [
        ("docs fix", candidate(&["README.md"], "+ typo", "success", 2)),
        (
            "env change",
            candidate(&["src/app.rs", ".env"], "+ DEBUG=1", "success", 4),
        ),
        (
            "risky migration",
            candidate(
                &["db/migrations/0042_drop.sql"],
                "DROP TABLE sessions;",
                "failure",
                30,
            ),
        ),
    ];

    for (name, candidate) in candidates {
        let response = engine
            .decide(DecisionRequest::new(candidate.to_context()).with_tenant("demo"))
            .await?;
        let decision_id = response.decision_id;
        let verdict = AutoMergeVerdict::from_response(&rule_set, response);

        println!("{}:", name);
        println!("  Decision ID: {}", decision_id);
        println!("  Eligible: {}", verdict.eligible);
        if !verdict.blocked_reasons.is_empty() {
            println!("  Blocked reasons: {}", verdict.blocked_reasons.join(", "));
        }
        println!("  Input hash: {}\n", verdict.decision.input_hash());
    }

    Ok(())
}
