//! S3 object store

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use chrono::{DateTime, Utc};

use super::{ListingEntry, ListingPage, ObjectStore, StorageError, StorageResult};

/// S3 client bound to one bucket
#[derive(Clone)]
pub struct S3Store {
    client: S3Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: S3Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

fn to_chrono(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait]
impl ObjectStore for S3Store {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn put_object(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Put {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn list_page(&self, continuation: Option<String>) -> StorageResult<ListingPage> {
        let output = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .set_continuation_token(continuation)
            .send()
            .await
            .map_err(|e| StorageError::List(e.to_string()))?;

        let entries = output
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?;
                match object.last_modified().and_then(to_chrono) {
                    Some(last_modified) => Some(ListingEntry {
                        key: key.to_string(),
                        last_modified,
                    }),
                    None => {
                        tracing::warn!(key = %key, "Object has no usable last-modified, ignoring");
                        None
                    }
                }
            })
            .collect();

        let next_token = if output.is_truncated().unwrap_or(false) {
            output.next_continuation_token().map(String::from)
        } else {
            None
        };

        Ok(ListingPage {
            entries,
            next_token,
        })
    }

    async fn get_object(&self, key: &str) -> StorageResult<Vec<u8>> {
        let get_err = |message: String| StorageError::Get {
            key: key.to_string(),
            message,
        };

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| get_err(e.to_string()))?;

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| get_err(e.to_string()))?;
        Ok(body.into_bytes().to_vec())
    }
}
