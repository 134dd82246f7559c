//! Object storage seam

pub mod s3;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

pub use s3::S3Store;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Put failed for '{key}': {message}")]
    Put { key: String, message: String },

    #[error("List failed: {0}")]
    List(String),

    #[error("Get failed for '{key}': {message}")]
    Get { key: String, message: String },
}

pub type StorageResult<T> = Result<T, StorageError>;

/// (key, last-modified) pair from an object listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub key: String,
    pub last_modified: DateTime<Utc>,
}

/// One page of an object listing
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    /// Token for the next page, `None` on the last page
    pub next_token: Option<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Bucket/container name, used in logs and errors
    fn bucket(&self) -> &str;

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str)
    -> StorageResult<()>;

    async fn list_page(&self, continuation: Option<String>) -> StorageResult<ListingPage>;

    /// Fetch an object body fully into memory
    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>>;
}
