//! Test fixtures for creating feeds and stored jobs.

use anyhow::Result;
use chrono::Utc;
use job_alerts_core::common::JobId;
use job_alerts_core::domains::jobs::{ApplicationStatus, Job, JobRecord};
use sqlx::PgConnection;

pub const TEST_CATEGORY: &str = "Information and Communications Technology";

/// Build an RSS 2.0 document from `(link, title)` pairs.
pub fn rss_feed(entries: &[(&str, &str)]) -> String {
    let items: String = entries
        .iter()
        .map(|(link, title)| {
            format!(
                "    <item>\n      <title>{}</title>\n      <link>{}</link>\n      \
                 <pubDate>Mon, 02 Jun 2025 09:30:00 +0000</pubDate>\n      \
                 <author>jobs@reliefweb.int (ReliefWeb)</author>\n    </item>\n",
                title, link
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <rss version=\"2.0\">\n  <channel>\n    <title>ReliefWeb - Jobs</title>\n    \
         <link>https://reliefweb.int/jobs</link>\n    <description>Jobs</description>\n\
         {}  </channel>\n</rss>\n",
        items
    )
}

pub fn job_record(link: &str, title: &str) -> JobRecord {
    JobRecord {
        title: Some(title.to_string()),
        link: link.to_string(),
        published: None,
        author: None,
        category: TEST_CATEGORY.to_string(),
        fetched_at: Utc::now(),
    }
}

/// Insert jobs and return their ids in input order.
pub async fn create_jobs(conn: &mut PgConnection, links: &[&str]) -> Result<Vec<JobId>> {
    let records: Vec<_> = links.iter().map(|link| job_record(link, "Engineer")).collect();
    Job::insert_many(&records, conn).await?;

    let mut ids = Vec::with_capacity(links.len());
    for link in links {
        let job = Job::find_by_link(link, conn)
            .await?
            .ok_or_else(|| anyhow::anyhow!("job {} was not stored", link))?;
        ids.push(job.id);
    }
    Ok(ids)
}

/// Stand-in for the person reviewing applications.
pub async fn set_status(
    conn: &mut PgConnection,
    job_id: JobId,
    status: ApplicationStatus,
) -> Result<()> {
    sqlx::query("UPDATE jobs SET application_status = $1 WHERE id = $2")
        .bind(status.to_string())
        .bind(job_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Insert `count` reminder rows for a job directly.
pub async fn add_reminders(conn: &mut PgConnection, job_id: JobId, count: usize) -> Result<()> {
    let ids = vec![job_id; count];
    job_alerts_core::domains::jobs::Reminder::record_many(&ids, conn).await?;
    Ok(())
}
