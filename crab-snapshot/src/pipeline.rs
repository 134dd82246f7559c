//! Invocation orchestration
//!
//! Each entry point opens one database connection, runs its pipeline, closes
//! the connection exactly once whatever the outcome, then sends exactly one
//! notification. All collaborators are injected per pipeline instance.

use std::future::Future;
use std::sync::Arc;

use crate::db::{Connector, DocumentStore};
use crate::error::{SnapshotError, SnapshotResult};
use crate::notify::{self, Notifier, Operation};
use crate::report::{InvocationReport, InvocationResponse, UploadOutcome};
use crate::storage::ObjectStore;
use crate::{backup, restore};

pub struct SnapshotPipeline {
    connector: Arc<dyn Connector>,
    objects: Arc<dyn ObjectStore>,
    notifier: Arc<dyn Notifier>,
}

impl SnapshotPipeline {
    pub fn new(
        connector: Arc<dyn Connector>,
        objects: Arc<dyn ObjectStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            connector,
            objects,
            notifier,
        }
    }

    /// Connect, run `op`, then close. A connect failure returns before any
    /// close is attempted.
    async fn with_connection<T, F, Fut>(&self, op: F) -> SnapshotResult<T>
    where
        F: FnOnce(Arc<dyn DocumentStore>) -> Fut,
        Fut: Future<Output = SnapshotResult<T>>,
    {
        let db = self
            .connector
            .connect()
            .await
            .map_err(SnapshotError::Connection)?;

        let result = op(db.clone()).await;

        match db.close().await {
            Ok(()) => tracing::info!("Database connection closed"),
            Err(e) => tracing::warn!(error = %e, "Failed to close database connection"),
        }
        result
    }

    /// Back up every collection to a new archive
    pub async fn run_backup(&self) -> InvocationResponse {
        tracing::info!(bucket = %self.objects.bucket(), "Starting backup");
        let objects = self.objects.clone();
        let result = self
            .with_connection(|db| async move { backup::run(db.as_ref(), objects.as_ref()).await })
            .await;

        let (response, text) = match result {
            Ok(report) => match &report.upload {
                UploadOutcome::Stored => (
                    InvocationResponse::ok(
                        "Backup completed successfully",
                        Some(InvocationReport::Backup(report.clone())),
                    ),
                    notify::success_message(Operation::Backup, &report.key),
                ),
                UploadOutcome::Failed { error } => {
                    // Status stays 200; the missing artifact is surfaced in the body
                    let text = notify::upload_failed_message(&report.key, error);
                    let mut response = InvocationResponse::ok(
                        "Backup archive built but not uploaded",
                        Some(InvocationReport::Backup(report.clone())),
                    );
                    response.body.error = Some(error.clone());
                    (response, text)
                }
            },
            Err(e) => {
                tracing::error!(error = %e, "Backup failed");
                (
                    InvocationResponse::failed("Backup failed", e.to_string()),
                    notify::failure_message(Operation::Backup, &e.to_string()),
                )
            }
        };

        notify::dispatch(self.notifier.as_ref(), &text).await;
        response
    }

    /// Restore from `key`, or from the newest archive when `None`
    pub async fn run_restore(&self, key: Option<String>) -> InvocationResponse {
        tracing::info!(bucket = %self.objects.bucket(), key = ?key, "Starting restore");
        let objects = self.objects.clone();
        let result = self
            .with_connection(|db| async move {
                restore::run(db.as_ref(), objects.as_ref(), key).await
            })
            .await;

        let (response, text) = match result {
            Ok(report) => {
                let text = notify::success_message(Operation::Restore, &report.key);
                (
                    InvocationResponse::ok(
                        "Restore completed successfully",
                        Some(InvocationReport::Restore(report)),
                    ),
                    text,
                )
            }
            Err(e) => {
                let text = notify::failure_message(Operation::Restore, &e.to_string());
                let response = InvocationResponse::failed("Restore failed", e.to_string());
                let response = match e {
                    SnapshotError::Apply {
                        collection, report, ..
                    } => {
                        tracing::error!(
                            collection = %collection,
                            replaced = ?report.replaced(),
                            "Restore aborted, database left partially restored"
                        );
                        response.with_report(InvocationReport::Restore(*report))
                    }
                    _ => {
                        tracing::error!(error = %e, "Restore failed");
                        response
                    }
                };
                (response, text)
            }
        };

        notify::dispatch(self.notifier.as_ref(), &text).await;
        response
    }
}
