use sqlx::{Connection, PgConnection};
use tracing::info;

use crate::common::{JobId, PipelineError, PipelineResult};
use crate::config::ReminderPolicy;
use crate::domains::jobs::activities::{notify_jobs, JobSelector};
use crate::domains::jobs::models::Reminder;
use crate::kernel::JobAlertDeps;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderReport {
    /// Pending jobs under the cap when the cycle started
    pub eligible: usize,
    /// Ids included in the reminder and recorded as reminded
    pub reminded: Vec<JobId>,
}

/// One reminder cycle: select pending jobs under the cap, notify, and record
/// a reminder for every job the notification included.
///
/// Selection and recording share one transaction. A failed notification
/// rolls back and records nothing.
pub async fn run_reminder_cycle(
    policy: &ReminderPolicy,
    conn: &mut PgConnection,
    deps: &JobAlertDeps,
) -> PipelineResult<ReminderReport> {
    let mut tx = conn
        .begin()
        .await
        .map_err(PipelineError::database("Failed to start reminder transaction"))?;

    let selector = JobSelector::ReminderEligible { cap: policy.cap };
    let jobs = selector.load(&mut *tx).await?;
    let eligible = jobs.len();
    let reminded = notify_jobs(&policy.title, &jobs, deps).await?;

    if reminded.is_empty() {
        tx.rollback()
            .await
            .map_err(PipelineError::database("Failed to roll back reminder transaction"))?;
        info!("No pending jobs need a reminder");
        return Ok(ReminderReport { eligible, reminded });
    }

    let recorded = Reminder::record_many(&reminded, &mut *tx).await?;
    tx.commit()
        .await
        .map_err(PipelineError::database("Failed to commit reminders"))?;

    info!(eligible, reminded = recorded, "Reminder cycle complete");
    Ok(ReminderReport { eligible, reminded })
}
