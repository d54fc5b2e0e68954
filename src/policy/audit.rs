//! Append-only audit trail: one JSON line per decision, written by a
//! dedicated task so log I/O never sits on the decision path.
//!
//! A failed write must not change or block the verdict being returned; it
//! bumps an error counter and emits a warning instead.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tracing::warn;

use crate::error::PolicyError;

/// One audit record. `ts` is epoch milliseconds (sortable); `corr` is a
/// per-request correlation id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditEntry {
    pub ts: i64,
    pub corr: String,
    pub user: String,
    pub op: String,
    pub path: String,
    pub allowed: bool,
    pub reason: String,
}

impl AuditEntry {
    pub fn new(user: &str, op: &str, path: &str, allowed: bool, reason: &str) -> Self {
        Self {
            ts: chrono::Utc::now().timestamp_millis(),
            corr: uuid::Uuid::new_v4().to_string(),
            user: user.to_string(),
            op: op.to_string(),
            path: path.to_string(),
            allowed,
            reason: reason.to_string(),
        }
    }
}

/// Audit sink handle. Entries flow over an unbounded channel to a single
/// writer task that owns the file, so concurrent callers never interleave
/// partial lines.
pub struct AuditLogger {
    tx: Option<mpsc::UnboundedSender<AuditEntry>>,
    errors: Arc<AtomicU64>,
    writer: Option<tokio::task::JoinHandle<()>>,
}

impl AuditLogger {
    /// Spawn a writer task appending JSON lines to `path`. Requires a Tokio
    /// runtime. If the file cannot be opened, the sink stays up and counts
    /// every entry as an error so the engine keeps answering.
    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<AuditEntry>();
        let errors = Arc::new(AtomicU64::new(0));
        let errs = errors.clone();
        let path = path.into();
        let writer = tokio::spawn(async move {
            let mut file = match tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
            {
                Ok(f) => Some(f),
                Err(e) => {
                    let err = PolicyError::AuditWrite(format!("open {}: {e}", path.display()));
                    warn!(target: "filewarden", "{err}");
                    None
                }
            };
            while let Some(entry) = rx.recv().await {
                let Some(f) = file.as_mut() else {
                    errs.fetch_add(1, Ordering::Relaxed);
                    continue;
                };
                let mut line = match serde_json::to_string(&entry) {
                    Ok(s) => s,
                    Err(e) => {
                        errs.fetch_add(1, Ordering::Relaxed);
                        warn!(target: "filewarden", "audit serialize failed: {e}");
                        continue;
                    }
                };
                line.push('\n');
                if let Err(e) = f.write_all(line.as_bytes()).await {
                    errs.fetch_add(1, Ordering::Relaxed);
                    let err = PolicyError::AuditWrite(e.to_string());
                    warn!(target: "filewarden", "{err}");
                }
            }
            if let Some(mut f) = file {
                let _ = f.flush().await;
            }
        });
        Self { tx: Some(tx), errors, writer: Some(writer) }
    }

    /// Null sink for embedding the engine without a log file.
    pub fn disabled() -> Self {
        Self { tx: None, errors: Arc::new(AtomicU64::new(0)), writer: None }
    }

    /// Enqueue one entry. Never blocks and never fails the caller; a dead
    /// writer only bumps the error counter.
    pub fn record(&self, entry: AuditEntry) {
        let Some(tx) = &self.tx else { return };
        if tx.send(entry).is_err() {
            self.errors.fetch_add(1, Ordering::Relaxed);
            warn!(target: "filewarden", "audit writer is gone; entry dropped");
        }
    }

    /// Number of entries lost to I/O or serialization failures.
    pub fn error_count(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Close the channel and wait for the writer to drain, so the file is
    /// complete when this returns.
    pub async fn shutdown(&mut self) {
        self.tx.take();
        if let Some(writer) = self.writer.take() {
            let _ = writer.await;
        }
    }
}
