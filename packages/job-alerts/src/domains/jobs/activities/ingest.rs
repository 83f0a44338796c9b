use sqlx::PgConnection;
use tracing::info;

use crate::common::{JobId, PipelineResult};
use crate::config::FeedSource;
use crate::domains::jobs::activities::{extract_jobs, notify_selected, JobSelector};
use crate::domains::jobs::models::Job;
use crate::kernel::JobAlertDeps;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Records extracted from the feed
    pub fetched: usize,
    /// Ids created by this run
    pub inserted: Vec<JobId>,
    /// Ids included in the new-jobs notification
    pub notified: Vec<JobId>,
}

/// Extract a feed, store unseen jobs, and notify about the ones this run
/// inserted that are still pending.
///
/// Jobs that were already stored are never re-announced here; they are
/// covered by the reminder cycle instead.
pub async fn ingest_feed(
    source: &FeedSource,
    conn: &mut PgConnection,
    deps: &JobAlertDeps,
) -> PipelineResult<IngestReport> {
    let records = extract_jobs(source, deps).await?;
    let inserted = Job::insert_many(&records, conn).await?;

    info!(
        fetched = records.len(),
        inserted = inserted.len(),
        "Stored jobs from feed"
    );

    let mut report = IngestReport {
        fetched: records.len(),
        inserted,
        notified: Vec::new(),
    };

    if report.inserted.is_empty() {
        return Ok(report);
    }

    let selector = JobSelector::Pending(report.inserted.clone());
    report.notified = notify_selected(&source.notification_title, &selector, conn, deps).await?;

    Ok(report)
}
