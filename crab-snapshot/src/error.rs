//! Pipeline error taxonomy
//!
//! Adapter errors (`DbError`, `StorageError`, `ArchiveError`) are wrapped with
//! the pipeline step that produced them. Upload and notification failures are
//! deliberately absent: neither escalates to an invocation failure.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::db::DbError;
use crate::report::RestoreReport;
use crate::storage::StorageError;

#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Database unreachable or misconfigured
    #[error("Database connection failed: {0}")]
    Connection(#[source] DbError),

    /// Listing collection names failed
    #[error("Failed to enumerate collections: {0}")]
    Enumeration(#[source] DbError),

    #[error("Failed to read collection '{collection}': {source}")]
    Read {
        collection: String,
        #[source]
        source: DbError,
    },

    #[error("Failed to build archive: {0}")]
    Encode(#[source] ArchiveError),

    #[error("No backup found in bucket '{bucket}'")]
    NoBackupFound { bucket: String },

    #[error("Failed to list backups: {0}")]
    Listing(#[source] StorageError),

    #[error("Failed to fetch backup '{key}': {source}")]
    Fetch {
        key: String,
        #[source]
        source: StorageError,
    },

    #[error("Failed to decode backup archive: {0}")]
    Decode(#[source] ArchiveError),

    /// Delete or insert failed mid-restore. `report` holds every entry
    /// handled so far, ending with the failed one.
    #[error("Failed to restore collection '{collection}': {source}")]
    Apply {
        collection: String,
        report: Box<RestoreReport>,
        #[source]
        source: DbError,
    },
}

pub type SnapshotResult<T> = Result<T, SnapshotError>;
