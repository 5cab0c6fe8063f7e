//! JSON Lines audit sink
//!
//! One record per line, appended to a single file. Writes are serialized
//! through a mutex so concurrent appends never interleave within a line.

use super::record::AuditRecord;
use super::sink::AuditSink;
use crate::error::{Result, RuntimeError};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Audit sink backed by a `.jsonl` file
#[derive(Debug)]
pub struct JsonlAuditSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlAuditSink {
    /// Create a sink writing to `path`; parent directories are created on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record in the file, in append order
    pub async fn read_all(&self) -> Result<Vec<AuditRecord>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(index, line)| {
                serde_json::from_str(line).map_err(|e| {
                    RuntimeError::Audit(format!(
                        "{}:{}: corrupt audit record: {}",
                        self.path.display(),
                        index + 1,
                        e
                    ))
                })
            })
            .collect()
    }

    async fn write_line(&self, record: &AuditRecord) -> Result<()> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(
            "Appended audit record {} to {}",
            record.record_id,
            self.path.display()
        );
        Ok(())
    }
}

#[async_trait]
impl AuditSink for JsonlAuditSink {
    async fn append(&self, record: AuditRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        self.write_line(&record).await
    }

    async fn append_after(&self, record: AuditRecord, seen: usize) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        let current = self
            .read_all()
            .await?
            .iter()
            .filter(|r| r.decision_id == record.decision_id)
            .count();
        if current != seen {
            return Ok(false);
        }
        self.write_line(&record).await?;
        Ok(true)
    }

    async fn records_for(&self, decision_id: Uuid) -> Result<Vec<AuditRecord>> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .filter(|r| r.decision_id == decision_id)
            .collect())
    }
}
