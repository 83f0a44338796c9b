//! Connection scoping and schema management.

use sqlx::migrate::Migrator;
use sqlx::{Connection, PgConnection};

use crate::common::PipelineError;
use crate::config::DatabaseConfig;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Advisory lock keys, one per flow, so an ingest never blocks a reminder run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowLock {
    Ingest,
    Reminders,
}

impl FlowLock {
    fn key(self) -> i64 {
        match self {
            FlowLock::Ingest => 0x6a6f_6273_0001,
            FlowLock::Reminders => 0x6a6f_6273_0002,
        }
    }
}

pub async fn connect(config: &DatabaseConfig) -> Result<PgConnection, PipelineError> {
    PgConnection::connect_with(&config.connect_options())
        .await
        .map_err(|e| {
            tracing::error!(host = %config.host, database = %config.name, "Failed to connect to database: {}", e);
            PipelineError::Database(e)
        })
}

/// Try to take the session-level lock for a flow. Returns false when
/// another session already holds it. Held until the connection closes.
pub async fn try_lock_flow(conn: &mut PgConnection, lock: FlowLock) -> Result<bool, PipelineError> {
    let acquired: bool = sqlx::query_scalar("SELECT pg_try_advisory_lock($1)")
        .bind(lock.key())
        .fetch_one(&mut *conn)
        .await
        .map_err(PipelineError::database("Failed to take flow lock"))?;
    Ok(acquired)
}

