//! Webhook notifier — POST `{"text": ...}` to a chat-style incoming webhook

use async_trait::async_trait;
use serde::Serialize;

use super::{Notifier, NotifyError};

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

#[derive(Clone)]
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, text: &str) -> Result<(), NotifyError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { text })
            .send()
            .await?;

        // Response is logged as-is; delivery is not confirmed beyond this
        let status = resp.status();
        let body = resp.text().await?;
        tracing::info!(status = %status, body = %body, "Notification sent");
        Ok(())
    }
}
