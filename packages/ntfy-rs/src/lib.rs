// https://docs.ntfy.sh/publish/

pub mod models;

use reqwest::{header, Client, Request};
use thiserror::Error;

pub use crate::models::{Message, Priority, PublishResponse};

#[derive(Debug, Error)]
pub enum NtfyError {
    #[error("invalid value for header {name}: {value:?}")]
    InvalidHeader { name: &'static str, value: String },

    #[error("request to ntfy failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("ntfy returned {status}: {body}")]
    Api { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub struct NtfyOptions {
    /// Server root, e.g. `https://ntfy.sh`.
    pub base_url: String,
    pub topic: String,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NtfyService {
    options: NtfyOptions,
    client: Client,
}

impl NtfyService {
    pub fn new(options: NtfyOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    pub fn with_client(options: NtfyOptions, client: Client) -> Self {
        Self { options, client }
    }

    pub fn topic_url(&self) -> String {
        format!(
            "{base}/{topic}",
            base = self.options.base_url.trim_end_matches('/'),
            topic = self.options.topic
        )
    }

    /// Build the publish request without sending it.
    pub fn build_publish(&self, message: &Message) -> Result<Request, NtfyError> {
        let mut headers = header::HeaderMap::new();

        if let Some(title) = &message.title {
            headers.insert("Title", header_value("Title", title)?);
        }
        headers.insert(
            "Priority",
            header::HeaderValue::from(u16::from(message.priority.value())),
        );
        if !message.tags.is_empty() {
            headers.insert("Tags", header_value("Tags", &message.tags.join(","))?);
        }
        if message.markdown {
            headers.insert("Markdown", header::HeaderValue::from_static("yes"));
        }
        if let Some(token) = &self.options.access_token {
            headers.insert(
                header::AUTHORIZATION,
                header_value("Authorization", &format!("Bearer {}", token))?,
            );
        }

        let request = self
            .client
            .post(self.topic_url())
            .headers(headers)
            .body(message.body.clone())
            .build()?;

        Ok(request)
    }

    pub async fn publish(&self, message: &Message) -> Result<PublishResponse, NtfyError> {
        let request = self.build_publish(message)?;
        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NtfyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<PublishResponse>().await?)
    }
}

fn header_value(name: &'static str, value: &str) -> Result<header::HeaderValue, NtfyError> {
    header::HeaderValue::from_str(value).map_err(|_| NtfyError::InvalidHeader {
        name,
        value: value.to_string(),
    })
}
