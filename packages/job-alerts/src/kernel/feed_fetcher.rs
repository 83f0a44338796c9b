use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use super::BaseFeedFetcher;

/// Fetches feeds over HTTP(S), or from disk for `file://` URLs and plain paths.
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("job-alerts/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BaseFeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let response = self
                .client
                .get(location)
                .send()
                .await
                .context("Failed to send feed request")?;

            if !response.status().is_success() {
                anyhow::bail!("Feed server returned {}", response.status());
            }

            let bytes = response
                .bytes()
                .await
                .context("Failed to read feed response body")?;
            return Ok(bytes.to_vec());
        }

        let path = location.strip_prefix("file://").unwrap_or(location);
        tokio::fs::read(Path::new(path))
            .await
            .with_context(|| format!("Failed to read feed file {}", path))
    }
}
