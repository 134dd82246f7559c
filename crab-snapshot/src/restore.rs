//! Archive restorer
//!
//! Entries are applied in archive order, one at a time. Each data entry with
//! a non-empty JSON array replaces the matching collection. Anything else is
//! skipped, leaving the live collection untouched. Collections missing from
//! the archive are never touched.
//!
//! A failed replace aborts the remaining entries: earlier collections stay
//! replaced, later ones stay as they were.

use crate::Document;
use crate::archive::{ArchiveEntry, SnapshotArchive};
use crate::db::{DbError, DocumentStore};
use crate::error::{SnapshotError, SnapshotResult};
use crate::locator;
use crate::report::{EntryRestore, RestoreOutcome, RestoreReport, SkipReason};
use crate::storage::ObjectStore;

/// Parse an entry payload into documents, or say why it must be skipped
pub fn parse_payload(payload: &[u8]) -> Result<Vec<Document>, SkipReason> {
    let value: serde_json::Value =
        serde_json::from_slice(payload).map_err(|_| SkipReason::Malformed)?;
    match value {
        serde_json::Value::Array(docs) if docs.is_empty() => Err(SkipReason::Empty),
        serde_json::Value::Array(docs) => Ok(docs),
        _ => Err(SkipReason::NotArray),
    }
}

/// Apply one entry and record its outcome. On a failed replace the failure is
/// recorded too, and the collection and cause are returned.
async fn apply_entry(
    db: &dyn DocumentStore,
    entry: ArchiveEntry,
    report: &mut RestoreReport,
) -> Result<(), (String, DbError)> {
    let Some(collection) = entry.collection_name().map(String::from) else {
        tracing::debug!(entry = %entry.name, "Skipping non-data entry");
        report.entries.push(EntryRestore {
            entry: entry.name,
            collection: None,
            outcome: RestoreOutcome::Skipped {
                reason: SkipReason::NotData,
            },
        });
        return Ok(());
    };

    let outcome = match parse_payload(&entry.payload) {
        Err(reason) => {
            tracing::warn!(
                collection = %collection,
                reason = ?reason,
                "Skipping collection, existing documents left untouched"
            );
            RestoreOutcome::Skipped { reason }
        }
        Ok(documents) => match db.replace_collection(&collection, documents).await {
            Ok(documents) => {
                tracing::info!(collection = %collection, documents, "Collection restored");
                RestoreOutcome::Replaced { documents }
            }
            Err(source) => {
                report.entries.push(EntryRestore {
                    entry: entry.name,
                    collection: Some(collection.clone()),
                    outcome: RestoreOutcome::Failed {
                        error: source.to_string(),
                    },
                });
                return Err((collection, source));
            }
        },
    };

    report.entries.push(EntryRestore {
        entry: entry.name,
        collection: Some(collection),
        outcome,
    });
    Ok(())
}

/// Apply every entry of a decoded archive
pub async fn apply_archive(
    db: &dyn DocumentStore,
    key: String,
    archive: SnapshotArchive,
) -> SnapshotResult<RestoreReport> {
    let mut report = RestoreReport {
        key,
        entries: Vec::with_capacity(archive.len()),
    };
    for entry in archive.into_entries() {
        if let Err((collection, source)) = apply_entry(db, entry, &mut report).await {
            return Err(SnapshotError::Apply {
                collection,
                report: Box::new(report),
                source,
            });
        }
    }
    Ok(report)
}

/// Restore from `key`, or from the newest archive in the bucket when `None`
pub async fn run(
    db: &dyn DocumentStore,
    objects: &dyn ObjectStore,
    key: Option<String>,
) -> SnapshotResult<RestoreReport> {
    let key = match key {
        Some(key) => key,
        None => locator::find_latest_backup(objects)
            .await
            .map_err(SnapshotError::Listing)?
            .map(|entry| entry.key)
            .ok_or_else(|| SnapshotError::NoBackupFound {
                bucket: objects.bucket().to_string(),
            })?,
    };

    let bytes = objects
        .get_object(&key)
        .await
        .map_err(|source| SnapshotError::Fetch {
            key: key.clone(),
            source,
        })?;
    tracing::info!(key = %key, bytes = bytes.len(), "Backup archive fetched");

    let archive = SnapshotArchive::from_bytes(&bytes).map_err(SnapshotError::Decode)?;
    apply_archive(db, key, archive).await
}
