use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use crab_snapshot::db::SurrealConnector;
use crab_snapshot::notify::WebhookNotifier;
use crab_snapshot::storage::S3Store;
use crab_snapshot::{Config, SnapshotPipeline};

#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    s3: S3Client,
}

impl AppState {
    pub fn new(config: Config, s3: S3Client) -> Self {
        Self {
            config: Arc::new(config),
            s3,
        }
    }

    /// Fresh collaborators for one invocation
    pub fn pipeline(&self) -> SnapshotPipeline {
        SnapshotPipeline::new(
            Arc::new(SurrealConnector::new(&self.config)),
            Arc::new(S3Store::new(self.s3.clone(), self.config.s3_bucket.clone())),
            Arc::new(WebhookNotifier::new(self.config.notify_webhook_url.clone())),
        )
    }
}
