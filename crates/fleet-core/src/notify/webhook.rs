//! Incoming-webhook notifier.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::Notifier;
use crate::config::NotifierConfig;
use crate::error::{Error, Result};
use crate::reply::Block;

#[derive(Debug, Serialize)]
struct WebhookPayload {
    blocks: Vec<Block>,
}

impl WebhookPayload {
    fn new(title: &str, body: &str) -> Self {
        Self {
            blocks: vec![Block::header(title), Block::section(body)],
        }
    }
}

/// Posts a header + section message to a chat incoming webhook
#[derive(Clone)]
pub struct WebhookNotifier {
    url: String,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, config: &NotifierConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, title: &str, body: &str) {
        let payload = WebhookPayload::new(title, body);

        match self.client.post(&self.url).json(&payload).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(title, "Notification delivered");
            }
            Ok(resp) => {
                warn!(
                    title,
                    status = resp.status().as_u16(),
                    "Notification rejected by webhook"
                );
            }
            Err(e) => {
                warn!(title, error = %e, "Notification delivery failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_payload_has_header_and_section() {
        let value = serde_json::to_value(WebhookPayload::new("Scheduled Shutdown", "a stopped"))
            .unwrap();
        assert_eq!(
            value,
            json!({
                "blocks": [
                    { "type": "header", "text": { "type": "plain_text", "text": "Scheduled Shutdown" } },
                    { "type": "section", "text": { "type": "mrkdwn", "text": "a stopped" } }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_delivery_failure_is_swallowed() {
        let notifier =
            WebhookNotifier::new("http://127.0.0.1:9/hook", &NotifierConfig::default()).unwrap();
        // Must return normally even though nothing is listening
        notifier.notify("title", "body").await;
    }
}
