//! Status notifications
//!
//! Best effort: one message per invocation, no retry, and a failed delivery
//! never changes the invocation result.

pub mod webhook;

use async_trait::async_trait;
use thiserror::Error;

pub use webhook::WebhookNotifier;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<(), NotifyError>;
}

/// Which pipeline produced the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Backup,
    Restore,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Backup => "Backup",
            Operation::Restore => "Restore",
        }
    }
}

pub fn success_message(op: Operation, key: &str) -> String {
    match op {
        Operation::Backup => format!("✅ Backup completed successfully: {key}"),
        Operation::Restore => format!("✅ Restore completed successfully from {key}"),
    }
}

pub fn failure_message(op: Operation, error: &str) -> String {
    format!("❌ {} failed: {error}", op.as_str())
}

pub fn upload_failed_message(key: &str, error: &str) -> String {
    format!("⚠️ Backup archive built but upload of {key} failed: {error}")
}

/// Send and swallow: failures are logged, never returned
pub async fn dispatch(notifier: &dyn Notifier, text: &str) {
    if let Err(e) = notifier.notify(text).await {
        tracing::error!(error = %e, "Failed to send notification");
    }
}
