//! Snapshot archiver
//!
//! Collections are enumerated once and read strictly one after another, so an
//! archive is a set of per-collection snapshots rather than one
//! database-wide point in time.

use chrono::{DateTime, Utc};

use crate::archive::{CONTENT_TYPE, SnapshotArchive};
use crate::db::DocumentStore;
use crate::error::{SnapshotError, SnapshotResult};
use crate::report::{BackupReport, CollectedCollection, UploadOutcome};
use crate::storage::ObjectStore;

/// Artifact key format: `MM-DD-YYYY-HH-MM-SS-backup`
///
/// Second granularity only. Two backups started within the same second write
/// the same key and the later upload wins.
pub const KEY_FORMAT: &str = "%m-%d-%Y-%H-%M-%S-backup";

pub fn artifact_key(at: DateTime<Utc>) -> String {
    at.format(KEY_FORMAT).to_string()
}

/// Archive built in memory, not yet uploaded
#[derive(Debug)]
pub struct BuiltArchive {
    pub bytes: Vec<u8>,
    pub collections: Vec<CollectedCollection>,
}

/// Read every collection into one archive buffer
pub async fn build_archive(db: &dyn DocumentStore) -> SnapshotResult<BuiltArchive> {
    let names = db
        .list_collections()
        .await
        .map_err(SnapshotError::Enumeration)?;
    tracing::info!(count = names.len(), "Collections enumerated");

    let mut archive = SnapshotArchive::new();
    let mut collections = Vec::with_capacity(names.len());

    for name in names {
        let documents = db
            .read_collection(&name)
            .await
            .map_err(|source| SnapshotError::Read {
                collection: name.clone(),
                source,
            })?;

        let payload = serde_json::to_vec_pretty(&documents)
            .map_err(|e| SnapshotError::Encode(e.into()))?;
        tracing::debug!(collection = %name, documents = documents.len(), "Collection captured");

        archive.push_collection(&name, payload);
        collections.push(CollectedCollection {
            name,
            documents: documents.len(),
        });
    }

    let bytes = archive.to_bytes().map_err(SnapshotError::Encode)?;
    Ok(BuiltArchive { bytes, collections })
}

/// Build and upload a backup archive.
///
/// The key is derived from the clock at upload time. A failed upload does not
/// fail the backup; it is returned as [`UploadOutcome::Failed`].
pub async fn run(db: &dyn DocumentStore, objects: &dyn ObjectStore) -> SnapshotResult<BackupReport> {
    let built = build_archive(db).await?;
    let archive_bytes = built.bytes.len();

    let key = artifact_key(Utc::now());
    let upload = match objects.put_object(&key, built.bytes, CONTENT_TYPE).await {
        Ok(()) => {
            tracing::info!(
                key = %key,
                bucket = %objects.bucket(),
                bytes = archive_bytes,
                "Backup archive uploaded"
            );
            UploadOutcome::Stored
        }
        Err(e) => {
            tracing::error!(key = %key, error = %e, "Backup archive upload failed");
            UploadOutcome::Failed {
                error: e.to_string(),
            }
        }
    };

    Ok(BackupReport {
        key,
        collections: built.collections,
        archive_bytes,
        upload,
    })
}
