// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Deciding which jobs to notify about lives in domains/jobs/activities.
//
// Naming convention: Base* for trait names (e.g., BaseNotifier)

use anyhow::Result;
use async_trait::async_trait;
use ntfy::Priority;

// =============================================================================
// Feed Fetcher Trait (Infrastructure)
// =============================================================================

#[async_trait]
pub trait BaseFeedFetcher: Send + Sync {
    /// Fetch the raw bytes of a feed document.
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;
}

// =============================================================================
// Notifier Trait (Infrastructure)
// =============================================================================

/// A single outbound alert, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub priority: Priority,
    pub tags: Vec<String>,
    /// Render the body as light markup
    pub markdown: bool,
}

#[async_trait]
pub trait BaseNotifier: Send + Sync {
    /// Dispatch one notification to the configured channel.
    async fn send(&self, notification: &Notification) -> Result<()>;
}
