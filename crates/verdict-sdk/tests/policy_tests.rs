//! End-to-end decisions over the bundled policies

mod common;

use common::{TestEngine, TWO_DOMAINS};
use verdict_sdk::policies::{
    AutoMergeVerdict, BundledPolicy, MergeCandidate, MonetizationPolicy, MonetizationSignals,
    SafetySignals,
};
use verdict_sdk::{Action, DecisionRequest, PolicyEngineBuilder};

#[tokio::test]
async fn test_vulnerable_user_financial_block() {
    let engine = PolicyEngineBuilder::new()
        .with_rule_set(BundledPolicy::Safety.rule_set().unwrap())
        .build()
        .await
        .unwrap();

    let signals = SafetySignals::new("should I put my savings into options")
        .with_intent("investment_advice")
        .vulnerable(true);
    let response = engine
        .decide(DecisionRequest::new(signals.to_context()))
        .await
        .unwrap();

    assert_eq!(response.final_action(), Action::Block);
    assert_eq!(response.decision.primary_domain(), Some("financial"));
    assert_eq!(response.decision.primary_rule(), Some("fin_vulnerable_block"));
}

#[tokio::test]
async fn test_env_file_blocks_automerge() {
    let rule_set = BundledPolicy::AutoMerge.rule_set().unwrap();
    let engine = PolicyEngineBuilder::new()
        .with_rule_set(rule_set.clone())
        .build()
        .await
        .unwrap();

    for ci in ["success", "failure"] {
        let candidate = MergeCandidate {
            changed_files: vec!["src/main.rs".to_string(), ".env".to_string()],
            diff: "+ API_URL=http://localhost".to_string(),
            ci_status: Some(ci.to_string()),
            validator_status: Some("passed".to_string()),
            lines_changed: 3,
            risk_level: Some("low".to_string()),
        };
        let response = engine
            .decide(DecisionRequest::new(candidate.to_context()))
            .await
            .unwrap();
        let verdict = AutoMergeVerdict::from_response(&rule_set, response);

        assert!(!verdict.eligible);
        assert!(verdict.blocked_reasons.contains(&"FORBIDDEN_PATH".to_string()));
    }
}

#[tokio::test]
async fn test_wrong_typed_ci_status_is_not_eligible() {
    let rule_set = BundledPolicy::AutoMerge.rule_set().unwrap();
    let engine = PolicyEngineBuilder::new()
        .with_rule_set(rule_set.clone())
        .build()
        .await
        .unwrap();

    let candidate = MergeCandidate {
        changed_files: vec!["README.md".to_string()],
        diff: "+ typo".to_string(),
        ci_status: Some("success".to_string()),
        validator_status: Some("passed".to_string()),
        lines_changed: 2,
        risk_level: Some("low".to_string()),
    };
    let context = candidate.to_context().with("ci_status", true);
    let response = engine.decide(DecisionRequest::new(context)).await.unwrap();
    let verdict = AutoMergeVerdict::from_response(&rule_set, response);

    assert!(!verdict.eligible);
    assert_eq!(verdict.blocked_reasons, vec!["CI_NOT_PASSING".to_string()]);
}

#[test]
fn test_ready_user_passes_monetization_gate() {
    let signals = MonetizationSignals {
        explicit_refusal: false,
        readiness_score: 0.8,
        blockers: Vec::new(),
        social_pressure: None,
        trust_score: None,
    };

    let outcome = MonetizationPolicy::default().evaluate(&signals).unwrap();

    assert!(outcome.passed);
    assert!(outcome.blocking_check.is_none());
    assert_eq!(outcome.action(), Action::Allow);
}

#[tokio::test]
async fn test_monetization_gate_through_engine() {
    let policy = MonetizationPolicy::default();
    let engine = PolicyEngineBuilder::new()
        .with_rule_set(policy.rule_set().unwrap())
        .build()
        .await
        .unwrap();

    let signals = MonetizationSignals {
        readiness_score: 0.3,
        ..MonetizationSignals::default()
    };

    let outcome = engine
        .gate(MonetizationPolicy::GATE_ID, &signals.to_context())
        .unwrap();
    assert_eq!(outcome.blocking_check.as_deref(), Some("readiness_threshold"));

    let request =
        DecisionRequest::new(signals.to_context()).with_domain(MonetizationPolicy::GATE_ID);
    let response = engine.decide(request).await.unwrap();
    assert_eq!(response.final_action(), Action::Block);
    assert_eq!(
        response.user_response().message.as_deref(),
        Some("It's not the right moment for an offer yet.")
    );
}

#[tokio::test]
async fn test_block_domain_is_primary() {
    let response = TestEngine::new(TWO_DOMAINS)
        .decide(&[("flag_x", true), ("flag_y", true)])
        .await;

    assert_eq!(response.decision.domain_result("x").unwrap().action, Action::Restrict);
    assert_eq!(response.decision.domain_result("y").unwrap().action, Action::Block);
    assert_eq!(response.final_action(), Action::Block);
    assert_eq!(response.decision.primary_domain(), Some("y"));
}
