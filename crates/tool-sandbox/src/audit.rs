//! Append-only JSON-lines audit trail for access-check decisions.
//!
//! Each record is serialised as a single newline-terminated JSON object, so
//! the log can be shipped, parsed, and replayed line by line.

use std::io::Write;
use std::path::Path;

use sandbox_policy::Decision;
use serde::{Deserialize, Serialize};

/// Errors that can occur while appending to the audit log.
#[derive(Debug, thiserror::Error)]
pub enum AuditWriteError {
    /// Parent directories could not be created.
    #[error("failed to create parent directories: {0}")]
    CreateDir(std::io::Error),

    /// The log file could not be opened in append mode.
    #[error("failed to open audit log file: {0}")]
    OpenFile(std::io::Error),

    /// The record could not be serialised.
    #[error("failed to serialize audit record: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The record could not be written.
    #[error("failed to write to audit log: {0}")]
    Write(std::io::Error),
}

/// One access-check decision, serialised as a single JSON line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record id.
    pub id: uuid::Uuid,
    /// When the check was performed.
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Name of the policy that was consulted.
    pub policy: String,
    /// `"file"` or `"network"`.
    pub resource_type: String,
    /// The candidate path or domain as given by the caller.
    pub resource: String,
    /// The verdict.
    pub decision: Decision,
}

impl AuditRecord {
    /// Create a record with an auto-generated UUID v4 and the current UTC
    /// timestamp.
    pub fn new(
        policy: impl Into<String>,
        resource_type: impl Into<String>,
        resource: impl Into<String>,
        decision: Decision,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            timestamp: chrono::Utc::now(),
            policy: policy.into(),
            resource_type: resource_type.into(),
            resource: resource.into(),
            decision,
        }
    }
}

/// Append `record` to the JSON-lines audit log at `path`.
///
/// Parent directories are created automatically if they do not exist.
pub fn append_record(path: &Path, record: &AuditRecord) -> Result<(), AuditWriteError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(AuditWriteError::CreateDir)?;
        }
    }

    let mut line = serde_json::to_vec(record)?;
    line.push(b'\n');

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(AuditWriteError::OpenFile)?;

    file.write_all(&line).map_err(AuditWriteError::Write)
}
