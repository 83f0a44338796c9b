// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into JobAlertDeps for tests.

use anyhow::Result;
use async_trait::async_trait;
use ntfy::Priority;
use std::sync::{Arc, Mutex};

use super::{BaseFeedFetcher, BaseNotifier, JobAlertDeps, Notification};

// =============================================================================
// Mock Feed Fetcher
// =============================================================================

/// Serves a fixed feed body regardless of location, or fails every fetch.
pub struct MockFeedFetcher {
    body: Arc<Mutex<Option<Vec<u8>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockFeedFetcher {
    pub fn new() -> Self {
        Self {
            body: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_body(self, body: impl Into<Vec<u8>>) -> Self {
        *self.body.lock().unwrap() = Some(body.into());
        self
    }

    /// Replace the served body between runs.
    pub fn set_body(&self, body: impl Into<Vec<u8>>) {
        *self.body.lock().unwrap() = Some(body.into());
    }

    /// Make subsequent fetches fail.
    pub fn set_unreachable(&self) {
        *self.body.lock().unwrap() = None;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseFeedFetcher for MockFeedFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        self.calls.lock().unwrap().push(location.to_string());
        match self.body.lock().unwrap().clone() {
            Some(body) => Ok(body),
            None => anyhow::bail!("connection refused: {}", location),
        }
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

/// Records every notification it is asked to send.
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    failing: Arc<Mutex<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            failing: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every send fail with a transport error.
    pub fn failing() -> Self {
        let notifier = Self::new();
        notifier.set_failing(true);
        notifier
    }

    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

impl Default for MockNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        if *self.failing.lock().unwrap() {
            anyhow::bail!("ntfy returned 502: bad gateway");
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

// =============================================================================
// TestDependencies
// =============================================================================

/// Mocks plus the deps container built from them.
pub struct TestDependencies {
    pub fetcher: Arc<MockFeedFetcher>,
    pub notifier: Arc<MockNotifier>,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            fetcher: Arc::new(MockFeedFetcher::new()),
            notifier: Arc::new(MockNotifier::new()),
        }
    }

    pub fn with_feed(self, body: impl Into<Vec<u8>>) -> Self {
        self.fetcher.set_body(body);
        self
    }

    pub fn deps(&self) -> JobAlertDeps {
        JobAlertDeps::new(self.fetcher.clone(), self.notifier.clone(), Priority::HIGH)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
