//! Chat notifications.
//!
//! Delivery is best-effort: implementations log failures and never return
//! them to the caller.

mod webhook;

pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use std::sync::Mutex;
use tracing::info;

/// Deliver a titled message to a chat channel.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, body: &str);
}

/// Writes notifications to the log. Used when no webhook is configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, title: &str, body: &str) {
        info!(title, "{}", body);
    }
}

/// A notification captured by [`MemoryNotifier`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

/// Keeps notifications in memory
#[derive(Debug, Default)]
pub struct MemoryNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn notify(&self, title: &str, body: &str) {
        self.sent
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Notification {
                title: title.to_string(),
                body: body.to_string(),
            });
    }
}
