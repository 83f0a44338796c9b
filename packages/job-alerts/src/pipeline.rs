//! Entry flows: each run opens one connection, takes the flow's advisory
//! lock, does its work, and closes the connection on every exit path.

use sqlx::{Connection, PgConnection};
use tracing::{info, warn};

use crate::common::PipelineResult;
use crate::config::Config;
use crate::domains::jobs::activities::{ingest_feed, run_reminder_cycle};
use crate::domains::jobs::{IngestReport, ReminderReport};
use crate::kernel::db::{self, FlowLock};
use crate::kernel::JobAlertDeps;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome<R> {
    Completed(R),
    /// Another run of the same flow held the lock; nothing was done
    AlreadyRunning,
}

impl<R> FlowOutcome<R> {
    pub fn completed(self) -> Option<R> {
        match self {
            FlowOutcome::Completed(report) => Some(report),
            FlowOutcome::AlreadyRunning => None,
        }
    }
}

pub struct Pipeline {
    config: Config,
    deps: JobAlertDeps,
}

impl Pipeline {
    pub fn new(config: Config, deps: JobAlertDeps) -> Self {
        Self { config, deps }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch, store, and notify about new jobs.
    pub async fn run_ingest(&self) -> PipelineResult<FlowOutcome<IngestReport>> {
        let mut conn = db::connect(&self.config.database).await?;
        let result = self.ingest_with(&mut conn).await;
        close(conn).await;
        result
    }

    /// Remind about pending jobs under the reminder cap.
    pub async fn run_reminders(&self) -> PipelineResult<FlowOutcome<ReminderReport>> {
        let mut conn = db::connect(&self.config.database).await?;
        let result = self.reminders_with(&mut conn).await;
        close(conn).await;
        result
    }

    async fn ingest_with(&self, conn: &mut PgConnection) -> PipelineResult<FlowOutcome<IngestReport>> {
        if !db::try_lock_flow(conn, FlowLock::Ingest).await? {
            warn!("Another ingest run holds the lock, skipping");
            return Ok(FlowOutcome::AlreadyRunning);
        }

        let report = ingest_feed(&self.config.feed, conn, &self.deps).await?;
        info!(
            fetched = report.fetched,
            inserted = report.inserted.len(),
            notified = report.notified.len(),
            "Ingest complete"
        );
        Ok(FlowOutcome::Completed(report))
    }

    async fn reminders_with(
        &self,
        conn: &mut PgConnection,
    ) -> PipelineResult<FlowOutcome<ReminderReport>> {
        if !db::try_lock_flow(conn, FlowLock::Reminders).await? {
            warn!("Another reminder run holds the lock, skipping");
            return Ok(FlowOutcome::AlreadyRunning);
        }

        let report = run_reminder_cycle(&self.config.reminders, conn, &self.deps).await?;
        Ok(FlowOutcome::Completed(report))
    }
}

/// Closing ends the session, which also drops any advisory lock it held.
async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        warn!("Failed to close database connection: {}", e);
    }
}
