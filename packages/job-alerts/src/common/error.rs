use thiserror::Error;
use tracing::error;

/// Failure taxonomy for both pipeline flows.
///
/// None of these are retried; every variant propagates to the binary and
/// becomes a non-zero exit.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to fetch feed {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Failed to parse feed {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: feed_rs::parser::ParseFeedError,
    },

    #[error("Failed to insert jobs: {0}")]
    Insert(#[source] sqlx::Error),

    #[error("Failed to send notification: {0}")]
    Notify(#[source] anyhow::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Log a failed job write where it happens and wrap it.
    pub fn insert(err: sqlx::Error) -> Self {
        error!("Failed to insert jobs: {}", err);
        PipelineError::Insert(err)
    }

    /// Error mapper that logs `context` alongside the database error.
    ///
    /// ```ignore
    /// query.fetch_all(&mut *conn).await.map_err(PipelineError::database("Failed to load jobs"))?;
    /// ```
    pub fn database(context: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |err| {
            error!("{}: {}", context, err);
            PipelineError::Database(err)
        }
    }
}
