use dotenvy::dotenv;
pub use ntfy::Priority;
use sqlx::postgres::PgConnectOptions;
use std::env;

use crate::common::PipelineError;

pub const DEFAULT_FEED_URL: &str =
    "https://reliefweb.int/jobs/rss.xml?advanced-search=%28CC6866%29_%28C131%29";
pub const DEFAULT_FEED_CATEGORY: &str = "Information and Communications Technology";
pub const DEFAULT_FEED_NOTIFICATION_TITLE: &str = "Jobs from Relief Web";
pub const DEFAULT_NTFY_BASE_URL: &str = "https://ntfy.sh";
pub const DEFAULT_NOTIFICATION_PRIORITY: Priority = Priority::HIGH;
pub const DEFAULT_REMINDER_CAP: i64 = 15;
pub const DEFAULT_REMINDER_TITLE: &str = "Pending job applications";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub notify: NotifyConfig,
    pub reminders: ReminderPolicy,
    pub feed: FeedSource,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub name: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub base_url: String,
    pub topic: String,
    pub access_token: Option<String>,
    pub priority: Priority,
}

/// When a pending job stops being reminded about, and what the reminder is called.
#[derive(Debug, Clone)]
pub struct ReminderPolicy {
    pub cap: i64,
    pub title: String,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            cap: DEFAULT_REMINDER_CAP,
            title: DEFAULT_REMINDER_TITLE.to_string(),
        }
    }
}

/// A feed to ingest plus the per-feed labels attached to its jobs.
#[derive(Debug, Clone)]
pub struct FeedSource {
    /// `http(s)://` URL, `file://` URL, or a plain filesystem path
    pub url: String,
    pub category: String,
    pub notification_title: String,
}

impl FeedSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            category: DEFAULT_FEED_CATEGORY.to_string(),
            notification_title: DEFAULT_FEED_NOTIFICATION_TITLE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, PipelineError> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Parse configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let database = DatabaseConfig {
            name: vars.required("POSTGRES_DB")?,
            user: vars.required("POSTGRES_USER")?,
            password: vars.required("POSTGRES_PASSWORD")?,
            host: vars.required("POSTGRES_HOST")?,
            port: parse("POSTGRES_PORT", &vars.required("POSTGRES_PORT")?)?,
        };

        let priority = match vars.optional("NTFY_PRIORITY") {
            Some(raw) => {
                let value: u8 = parse("NTFY_PRIORITY", &raw)?;
                Priority::new(value).ok_or_else(|| {
                    PipelineError::Config(format!(
                        "NTFY_PRIORITY must be between 1 and 5, got {}",
                        value
                    ))
                })?
            }
            None => DEFAULT_NOTIFICATION_PRIORITY,
        };

        let notify = NotifyConfig {
            base_url: vars
                .optional("NTFY_BASE_URL")
                .unwrap_or_else(|| DEFAULT_NTFY_BASE_URL.to_string()),
            topic: vars.required("NTFY_TOPIC")?,
            access_token: vars.optional("NTFY_TOKEN"),
            priority,
        };

        let cap = match vars.optional("REMINDER_CAP") {
            Some(raw) => parse("REMINDER_CAP", &raw)?,
            None => DEFAULT_REMINDER_CAP,
        };
        if cap < 1 {
            return Err(PipelineError::Config(format!(
                "REMINDER_CAP must be positive, got {}",
                cap
            )));
        }

        let reminders = ReminderPolicy {
            cap,
            title: vars
                .optional("REMINDER_TITLE")
                .unwrap_or_else(|| DEFAULT_REMINDER_TITLE.to_string()),
        };

        let feed = FeedSource {
            url: vars
                .optional("FEED_URL")
                .unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            category: vars
                .optional("FEED_CATEGORY")
                .unwrap_or_else(|| DEFAULT_FEED_CATEGORY.to_string()),
            notification_title: vars
                .optional("FEED_NOTIFICATION_TITLE")
                .unwrap_or_else(|| DEFAULT_FEED_NOTIFICATION_TITLE.to_string()),
        };

        Ok(Self {
            database,
            notify,
            reminders,
            feed,
        })
    }
}

struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, key: &str) -> Result<String, PipelineError> {
        self.optional(key)
            .ok_or_else(|| PipelineError::Config(format!("{} must be set", key)))
    }
}

fn parse<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, PipelineError> {
    raw.parse()
        .map_err(|_| PipelineError::Config(format!("{} has an invalid value: {:?}", key, raw)))
}
