//! Audit contract
//!
//! Every decision is recorded once, as an [`AuditRecord`], and never changed
//! afterwards. Overrides do not edit the decision record: they append a
//! separate record that references it, so the history of a decision is the
//! ordered list of its records.

mod jsonl;
mod overrides;
mod record;
mod sink;

pub use jsonl::JsonlAuditSink;
pub use overrides::{apply_override, OverrideRequest};
pub use record::{effective_action, AuditEntry, AuditRecord, CausalRef};
pub use sink::{AuditSink, MemoryAuditSink};
