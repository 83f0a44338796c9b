//! Pipeline dependencies (using traits for testability)
//!
//! Flows reach the outside world only through this container, so tests can
//! swap in the mocks from `test_dependencies`.

use anyhow::Result;
use async_trait::async_trait;
use ntfy::{Message, NtfyOptions, NtfyService, Priority};
use std::sync::Arc;

use crate::config::Config;
use crate::kernel::{BaseFeedFetcher, BaseNotifier, HttpFeedFetcher, Notification};

// =============================================================================
// NtfyService Adapter (implements BaseNotifier trait)
// =============================================================================

/// Wrapper around NtfyService that implements BaseNotifier trait
pub struct NtfyAdapter(pub Arc<NtfyService>);

impl NtfyAdapter {
    pub fn new(service: Arc<NtfyService>) -> Self {
        Self(service)
    }
}

#[async_trait]
impl BaseNotifier for NtfyAdapter {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let message = Message::new(notification.body.clone())
            .title(notification.title.clone())
            .priority(notification.priority)
            .tags(notification.tags.iter().cloned())
            .markdown(notification.markdown);

        let response = self.0.publish(&message).await?;
        tracing::debug!(message_id = %response.id, topic = %response.topic, "ntfy accepted message");
        Ok(())
    }
}

// =============================================================================
// JobAlertDeps
// =============================================================================

/// External services used by the ingest and reminder flows
#[derive(Clone)]
pub struct JobAlertDeps {
    pub fetcher: Arc<dyn BaseFeedFetcher>,
    pub notifier: Arc<dyn BaseNotifier>,
    /// Priority attached to every outbound notification
    pub notification_priority: Priority,
}

impl JobAlertDeps {
    pub fn new(
        fetcher: Arc<dyn BaseFeedFetcher>,
        notifier: Arc<dyn BaseNotifier>,
        notification_priority: Priority,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            notification_priority,
        }
    }

    /// Wire the production HTTP fetcher and ntfy notifier.
    pub fn from_config(config: &Config) -> Result<Self> {
        let ntfy = NtfyService::new(NtfyOptions {
            base_url: config.notify.base_url.clone(),
            topic: config.notify.topic.clone(),
            access_token: config.notify.access_token.clone(),
        });

        Ok(Self::new(
            Arc::new(HttpFeedFetcher::new()?),
            Arc::new(NtfyAdapter::new(Arc::new(ntfy))),
            config.notify.priority,
        ))
    }
}
