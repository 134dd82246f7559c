//! Invocation results
//!
//! Every invocation ends in exactly one [`InvocationResponse`]: status 200 or
//! 500 and a `{ message, error?, report? }` body.

use serde::Serialize;

// ── Backup ──

/// Collection captured in a backup archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedCollection {
    pub name: String,
    pub documents: usize,
}

/// Whether the built archive reached object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum UploadOutcome {
    Stored,
    Failed { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct BackupReport {
    /// Artifact key the archive was (or would have been) stored under
    pub key: String,
    pub collections: Vec<CollectedCollection>,
    pub archive_bytes: usize,
    pub upload: UploadOutcome,
}

impl BackupReport {
    pub fn is_persisted(&self) -> bool {
        matches!(self.upload, UploadOutcome::Stored)
    }
}

// ── Restore ──

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Directory or non-JSON entry
    NotData,
    /// Payload is not valid JSON
    Malformed,
    /// Payload is valid JSON but not an array
    NotArray,
    /// Payload is an empty array
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RestoreOutcome {
    Replaced { documents: usize },
    Skipped { reason: SkipReason },
    /// Replace failed; the restore stopped here
    Failed { error: String },
}

/// Result of applying one archive entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryRestore {
    pub entry: String,
    /// `None` for non-data entries
    pub collection: Option<String>,
    pub outcome: RestoreOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestoreReport {
    pub key: String,
    pub entries: Vec<EntryRestore>,
}

impl RestoreReport {
    /// Collections whose contents were replaced, in application order
    pub fn replaced(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, RestoreOutcome::Replaced { .. }))
            .filter_map(|e| e.collection.as_deref())
            .collect()
    }
}

// ── Response ──

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum InvocationReport {
    Backup(BackupReport),
    Restore(RestoreReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<InvocationReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvocationResponse {
    #[serde(rename = "statusCode")]
    pub status: u16,
    pub body: ResponseBody,
}

impl InvocationResponse {
    pub const OK: u16 = 200;
    pub const FAILED: u16 = 500;

    pub fn ok(message: impl Into<String>, report: Option<InvocationReport>) -> Self {
        Self {
            status: Self::OK,
            body: ResponseBody {
                message: message.into(),
                error: None,
                report,
            },
        }
    }

    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: Self::FAILED,
            body: ResponseBody {
                message: message.into(),
                error: Some(error.into()),
                report: None,
            },
        }
    }

    pub fn with_report(mut self, report: InvocationReport) -> Self {
        self.body.report = Some(report);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Self::OK
    }
}
