//! Audit sinks

use super::record::AuditRecord;
use crate::error::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Append-only destination for audit records
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Persist a record; records are never updated or removed afterwards
    async fn append(&self, record: AuditRecord) -> Result<()>;

    /// Append `record` only while its decision still has `seen` records
    ///
    /// Returns `false`, appending nothing, when another record for the same
    /// decision was appended since the caller read the history. The check and
    /// the append are atomic with respect to other appends on this sink.
    async fn append_after(&self, record: AuditRecord, seen: usize) -> Result<bool>;

    /// All records of one decision, in append order
    async fn records_for(&self, decision_id: Uuid) -> Result<Vec<AuditRecord>>;
}

/// In-memory audit sink
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    records: RwLock<Vec<AuditRecord>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every record appended so far
    pub async fn records(&self) -> Vec<AuditRecord> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl AuditSink for MemoryAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<()> {
        tracing::debug!(
            "Audit record {} for decision {}",
            record.record_id,
            record.decision_id
        );
        self.records.write().await.push(record);
        Ok(())
    }

    async fn append_after(&self, record: AuditRecord, seen: usize) -> Result<bool> {
        let mut records = self.records.write().await;
        let current = records
            .iter()
            .filter(|r| r.decision_id == record.decision_id)
            .count();
        if current != seen {
            return Ok(false);
        }
        records.push(record);
        Ok(true)
    }

    async fn records_for(&self, decision_id: Uuid) -> Result<Vec<AuditRecord>> {
        Ok(self
            .records
            .read()
            .await
            .iter()
            .filter(|r| r.decision_id == decision_id)
            .cloned()
            .collect())
    }
}
