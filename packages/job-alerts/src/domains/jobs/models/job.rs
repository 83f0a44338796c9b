use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Connection, PgConnection};
use std::collections::HashSet;

use crate::common::{JobId, PipelineError};

/// A job posting as extracted from a feed, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: Option<String>,
    /// Identity of the posting
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub category: String,
    pub fetched_at: DateTime<Utc>,
}

/// Job - a stored posting (deduplicated by link)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: JobId,
    pub title: Option<String>,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub category: String,
    pub fetched_at: DateTime<Utc>,
    pub application_status: String, // 'pending', 'applied', 'rejected', 'archived'
    pub created_at: DateTime<Utc>,
}

/// Application status enum
///
/// Only `Pending` jobs are notified about. Status is changed by whoever is
/// reviewing applications, never by the pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Applied,
    Rejected,
    Archived,
}

impl std::fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApplicationStatus::Pending => write!(f, "pending"),
            ApplicationStatus::Applied => write!(f, "applied"),
            ApplicationStatus::Rejected => write!(f, "rejected"),
            ApplicationStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for ApplicationStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "applied" => Ok(ApplicationStatus::Applied),
            "rejected" => Ok(ApplicationStatus::Rejected),
            "archived" => Ok(ApplicationStatus::Archived),
            _ => Err(anyhow::anyhow!("Invalid application status: {}", s)),
        }
    }
}

impl Job {
    pub fn status(&self) -> anyhow::Result<ApplicationStatus> {
        self.application_status.parse()
    }
}

/// Drop records whose link already appeared earlier in the batch.
pub fn dedupe_by_link(records: &[JobRecord]) -> Vec<&JobRecord> {
    let mut seen = HashSet::new();
    records
        .iter()
        .filter(|record| seen.insert(record.link.as_str()))
        .collect()
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Job {
    /// Bulk insert, skipping links that already exist.
    ///
    /// Runs in one transaction and returns only the ids created by this
    /// call; rows skipped on conflict produce no id.
    pub async fn insert_many(
        records: &[JobRecord],
        conn: &mut PgConnection,
    ) -> Result<Vec<JobId>, PipelineError> {
        let unique = dedupe_by_link(records);
        if unique.is_empty() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::with_capacity(unique.len());
        let mut titles = Vec::with_capacity(unique.len());
        let mut links = Vec::with_capacity(unique.len());
        let mut published = Vec::with_capacity(unique.len());
        let mut authors = Vec::with_capacity(unique.len());
        let mut categories = Vec::with_capacity(unique.len());
        let mut fetched_at = Vec::with_capacity(unique.len());

        for record in unique {
            ids.push(JobId::new().into_uuid());
            titles.push(record.title.clone());
            links.push(record.link.clone());
            published.push(record.published);
            authors.push(record.author.clone());
            categories.push(record.category.clone());
            fetched_at.push(record.fetched_at);
        }

        let mut tx = conn.begin().await.map_err(PipelineError::insert)?;

        let inserted = sqlx::query_scalar::<_, JobId>(
            r#"
            INSERT INTO jobs (id, title, link, published, author, category, fetched_at)
            SELECT * FROM UNNEST(
                $1::uuid[], $2::text[], $3::text[], $4::timestamptz[],
                $5::text[], $6::text[], $7::timestamptz[]
            )
            ON CONFLICT (link) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(&ids)
        .bind(&titles)
        .bind(&links)
        .bind(&published)
        .bind(&authors)
        .bind(&categories)
        .bind(&fetched_at)
        .fetch_all(&mut *tx)
        .await
        .map_err(PipelineError::insert)?;

        tx.commit().await.map_err(PipelineError::insert)?;

        Ok(inserted)
    }

    /// Find jobs by id that are still pending
    pub async fn find_pending_by_ids(
        ids: &[JobId],
        conn: &mut PgConnection,
    ) -> Result<Vec<Self>, PipelineError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<_> = ids.iter().map(|id| id.into_uuid()).collect();
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT * FROM jobs
            WHERE id = ANY($1)
              AND application_status = 'pending'
            ORDER BY published DESC NULLS LAST, link
            "#,
        )
        .bind(&uuids)
        .fetch_all(&mut *conn)
        .await
        .map_err(PipelineError::database("Failed to load pending jobs"))?;
        Ok(jobs)
    }

    /// Find pending jobs that have been reminded about fewer than `cap` times.
    ///
    /// Jobs with no reminders yet count as zero.
    pub async fn find_reminder_eligible(
        cap: i64,
        conn: &mut PgConnection,
    ) -> Result<Vec<Self>, PipelineError> {
        let jobs = sqlx::query_as::<_, Job>(
            r#"
            SELECT j.* FROM jobs j
            LEFT JOIN reminders r ON r.job_id = j.id
            WHERE j.application_status = 'pending'
            GROUP BY j.id
            HAVING COUNT(r.id) < $1
            ORDER BY j.published DESC NULLS LAST, j.link
            "#,
        )
        .bind(cap)
        .fetch_all(&mut *conn)
        .await
        .map_err(PipelineError::database("Failed to load reminder-eligible jobs"))?;
        Ok(jobs)
    }

    pub async fn find_by_link(
        link: &str,
        conn: &mut PgConnection,
    ) -> Result<Option<Self>, PipelineError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE link = $1")
            .bind(link)
            .fetch_optional(&mut *conn)
            .await
            .map_err(PipelineError::database("Failed to look up job by link"))?;
        Ok(job)
    }

    pub async fn count(conn: &mut PgConnection) -> Result<i64, PipelineError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM jobs")
            .fetch_one(&mut *conn)
            .await
            .map_err(PipelineError::database("Failed to count jobs"))?;
        Ok(count)
    }
}
