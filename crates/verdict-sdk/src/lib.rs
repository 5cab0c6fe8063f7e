//! Verdict SDK
//!
//! High-level API of the Verdict policy gate engine: build an engine from a
//! rule set, make audited decisions, override them through the audit trail,
//! and reload rule sets without disturbing evaluations in flight.
//!
//! ```rust,ignore
//! use verdict_sdk::{DecisionRequest, PolicyEngineBuilder, policies::BundledPolicy};
//!
//! let engine = PolicyEngineBuilder::new()
//!     .with_rule_set(BundledPolicy::Safety.rule_set()?)
//!     .build()
//!     .await?;
//!
//! let response = engine
//!     .decide(DecisionRequest::new(ctx).with_tenant("acme"))
//!     .await?;
//! println!("{}", response.final_action());
//! ```

pub mod builder;
pub mod config;
pub mod engine;
pub mod error;
pub mod policies;
pub mod types;

// Re-export main types
pub use builder::PolicyEngineBuilder;
pub use config::EngineConfig;
pub use engine::PolicyEngine;
pub use error::{Result, SdkError};
pub use types::{DecisionRequest, DecisionResponse, UserResponse};

// Re-export commonly used types from dependencies
pub use verdict_core::{Action, EvaluationContext, RuleSet, Value};
pub use verdict_runtime::{
    AuditRecord, AuditSink, DecisionEvent, EventPublisher, ExecutionMode, FinalDecision,
    GateOutcome, OverrideRequest,
};
