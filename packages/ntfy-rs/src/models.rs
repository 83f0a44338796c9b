use serde::Deserialize;

/// Message priority as understood by ntfy (1 = min, 5 = urgent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority(u8);

impl Priority {
    pub const MIN: Priority = Priority(1);
    pub const LOW: Priority = Priority(2);
    pub const DEFAULT: Priority = Priority(3);
    pub const HIGH: Priority = Priority(4);
    pub const URGENT: Priority = Priority(5);

    /// Returns `None` when the value is outside 1..=5.
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::DEFAULT
    }
}

/// A message published to a topic.
///
/// The body is sent as-is; everything else travels in headers.
#[derive(Debug, Clone, Default)]
pub struct Message {
    pub title: Option<String>,
    pub body: String,
    pub priority: Priority,
    pub tags: Vec<String>,
    pub markdown: bool,
}

impl Message {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn markdown(mut self, markdown: bool) -> Self {
        self.markdown = markdown;
        self
    }
}

/// Subset of the JSON ntfy returns for a published message.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishResponse {
    pub id: String,
    pub time: i64,
    pub topic: String,
    #[serde(default)]
    pub event: Option<String>,
}
