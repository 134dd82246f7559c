//! Snapshot locator — newest object in the backup bucket
//!
//! Walks every listing page via continuation tokens. Selection is by
//! last-modified only; keys are not inspected and equal timestamps are not
//! tie-broken.

use crate::storage::{ListingEntry, ObjectStore, StorageResult};

/// Newest entry among `entries`, `None` when empty
pub fn latest(entries: impl IntoIterator<Item = ListingEntry>) -> Option<ListingEntry> {
    entries.into_iter().max_by_key(|e| e.last_modified)
}

/// Most recently modified object in the bucket, `None` when the bucket is empty
pub async fn find_latest_backup(objects: &dyn ObjectStore) -> StorageResult<Option<ListingEntry>> {
    let mut newest: Option<ListingEntry> = None;
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = objects.list_page(token.take()).await?;
        pages += 1;

        newest = latest(newest.into_iter().chain(page.entries));

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    match &newest {
        Some(entry) => tracing::info!(
            key = %entry.key,
            last_modified = %entry.last_modified,
            pages,
            "Latest backup located"
        ),
        None => tracing::warn!(bucket = %objects.bucket(), "No backups in bucket"),
    }
    Ok(newest)
}
