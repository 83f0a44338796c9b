use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;

use crate::common::{JobId, PipelineError, ReminderId};

/// Reminder - one row per reminder sent about a job
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reminder {
    pub id: ReminderId,
    pub job_id: JobId,
    pub sent_at: DateTime<Utc>,
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Reminder {
    /// Record one reminder per job. Runs on the caller's connection so it
    /// can share the transaction that selected the jobs.
    pub async fn record_many(
        job_ids: &[JobId],
        conn: &mut PgConnection,
    ) -> Result<u64, PipelineError> {
        if job_ids.is_empty() {
            return Ok(0);
        }

        let ids: Vec<_> = job_ids.iter().map(|_| ReminderId::new().into_uuid()).collect();
        let jobs: Vec<_> = job_ids.iter().map(|id| id.into_uuid()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO reminders (id, job_id)
            SELECT * FROM UNNEST($1::uuid[], $2::uuid[])
            "#,
        )
        .bind(&ids)
        .bind(&jobs)
        .execute(&mut *conn)
        .await
        .map_err(PipelineError::database("Failed to record reminders"))?;

        Ok(result.rows_affected())
    }

    pub async fn count_for_job(job_id: JobId, conn: &mut PgConnection) -> Result<i64, PipelineError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM reminders WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&mut *conn)
            .await
            .map_err(PipelineError::database("Failed to count reminders"))?;
        Ok(count)
    }

    pub async fn find_for_job(
        job_id: JobId,
        conn: &mut PgConnection,
    ) -> Result<Vec<Self>, PipelineError> {
        let reminders = sqlx::query_as::<_, Reminder>(
            "SELECT * FROM reminders WHERE job_id = $1 ORDER BY sent_at, id",
        )
        .bind(job_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(PipelineError::database("Failed to load reminders"))?;
        Ok(reminders)
    }
}
