//! Append-only audit trail.
//!
//! Every call decision and every configuration change is recorded as an
//! [`AuditEvent`]. Events go to an [`AuditSink`]: a JSONL file for off-chain
//! observers ([`JsonlAuditLog`]), or an in-memory log for inspection and
//! tests ([`MemoryAuditLog`]).

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("audit log {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("audit event encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// One line of the audit trail.
///
/// `event_type` names what happened (`call_decision`, `owner_withdraw`,
/// `whitelist_change`, `manager_change`, `guard_change`,
/// `ownership_change`). For decisions `outcome` is the reason code, so
/// `"allowed"` or the denial code; for configuration changes it is
/// `"changed"`, `"unchanged"` or `"unauthorized"`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub details: serde_json::Value,
    pub outcome: String,
}

impl AuditEvent {
    /// Stamp an event with the current time.
    pub fn new(
        event_type: impl Into<String>,
        details: serde_json::Value,
        outcome: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: event_type.into(),
            details,
            outcome: outcome.into(),
        }
    }
}

/// Destination for audit events.
pub trait AuditSink: Send {
    fn record(&mut self, event: AuditEvent) -> Result<(), AuditError>;
}

/// JSONL file sink. Opening an existing file appends to it; each record is
/// flushed before `record` returns.
pub struct JsonlAuditLog {
    path: PathBuf,
    out: BufWriter<File>,
}

impl JsonlAuditLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AuditError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::Io {
                path: path.clone(),
                source,
            })?;
        Ok(Self {
            path,
            out: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AuditSink for JsonlAuditLog {
    fn record(&mut self, event: AuditEvent) -> Result<(), AuditError> {
        serde_json::to_writer(&mut self.out, &event)?;
        self.out
            .write_all(b"\n")
            .and_then(|()| self.out.flush())
            .map_err(|source| AuditError::Io {
                path: self.path.clone(),
                source,
            })
    }
}

/// In-memory audit log. Clones share the same buffer, so a handle kept by
/// the caller observes events recorded through the vault.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuditLog {
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl MemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of all recorded events, oldest first.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Recorded events of one type.
    pub fn events_of(&self, event_type: &str) -> Vec<AuditEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemoryAuditLog {
    fn record(&mut self, event: AuditEvent) -> Result<(), AuditError> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
        Ok(())
    }
}
