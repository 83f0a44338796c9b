//! Notification formatting and dispatch.

use sqlx::PgConnection;
use tracing::{debug, error, info};

use crate::common::{JobId, PipelineError, PipelineResult};
use crate::domains::jobs::models::Job;
use crate::kernel::{JobAlertDeps, Notification};

/// Which stored jobs a notification should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobSelector {
    /// These ids, narrowed to the ones still pending
    Pending(Vec<JobId>),
    /// Pending jobs reminded about fewer than `cap` times
    ReminderEligible { cap: i64 },
}

impl JobSelector {
    pub async fn load(&self, conn: &mut PgConnection) -> PipelineResult<Vec<Job>> {
        match self {
            JobSelector::Pending(ids) => Job::find_pending_by_ids(ids, conn).await,
            JobSelector::ReminderEligible { cap } => Job::find_reminder_eligible(*cap, conn).await,
        }
    }
}

/// Load the selected jobs and notify about them.
pub async fn notify_selected(
    title: &str,
    selector: &JobSelector,
    conn: &mut PgConnection,
    deps: &JobAlertDeps,
) -> PipelineResult<Vec<JobId>> {
    let jobs = selector.load(conn).await?;
    notify_jobs(title, &jobs, deps).await
}

/// Send one notification covering `jobs` and return the ids it included.
///
/// An empty batch sends nothing.
pub async fn notify_jobs(title: &str, jobs: &[Job], deps: &JobAlertDeps) -> PipelineResult<Vec<JobId>> {
    if jobs.is_empty() {
        debug!(title, "No jobs to notify about");
        return Ok(Vec::new());
    }

    let notification = Notification {
        title: title.to_string(),
        body: format_message(jobs),
        priority: deps.notification_priority,
        tags: category_tags(jobs),
        markdown: true,
    };

    deps.notifier.send(&notification).await.map_err(|e| {
        error!(title, count = jobs.len(), "Failed to send notification: {:#}", e);
        PipelineError::Notify(e)
    })?;

    info!(title, count = jobs.len(), "Notification sent");
    Ok(jobs.iter().map(|job| job.id).collect())
}

/// Markdown hard break: ntfy joins lines separated by a bare newline.
const LINE_BREAK: &str = "  \n";

/// One block per job, a field per line.
pub fn format_job(job: &Job) -> String {
    let published = job
        .published
        .map(|p| p.to_rfc3339())
        .unwrap_or_else(|| "unknown".to_string());

    [
        format!("Title: {}", job.title.as_deref().unwrap_or("(untitled)")),
        format!("Link: {}", job.link),
        format!("Published: {}", published),
        format!("Author: {}", job.author.as_deref().unwrap_or("unknown")),
        format!("Category: {}", job.category),
        format!("FetchedAt: {}", job.fetched_at.to_rfc3339()),
    ]
    .join(LINE_BREAK)
}

pub fn format_message(jobs: &[Job]) -> String {
    jobs.iter().map(format_job).collect::<Vec<_>>().join("\n\n")
}

/// Distinct categories in first-seen order.
fn category_tags(jobs: &[Job]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for job in jobs {
        if !tags.contains(&job.category) {
            tags.push(job.category.clone());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::TestDependencies;
    use chrono::{TimeZone, Utc};
    use ntfy::Priority;

    fn job(link: &str, title: Option<&str>, category: &str) -> Job {
        Job {
            id: JobId::new(),
            title: title.map(str::to_string),
            link: link.to_string(),
            published: Some(Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap()),
            author: Some("UNICEF".to_string()),
            category: category.to_string(),
            fetched_at: Utc.with_ymd_and_hms(2025, 6, 3, 12, 0, 0).unwrap(),
            application_status: "pending".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn formats_a_block_per_job() {
        let block = format_job(&job("https://reliefweb.int/job/1", Some("Engineer"), "ICT"));

        assert_eq!(
            block,
            "Title: Engineer  \n\
             Link: https://reliefweb.int/job/1  \n\
             Published: 2025-06-02T09:30:00+00:00  \n\
             Author: UNICEF  \n\
             Category: ICT  \n\
             FetchedAt: 2025-06-03T12:00:00+00:00"
        );
    }

    #[test]
    fn field_lines_survive_markdown_rendering() {
        let jobs = vec![
            job("https://reliefweb.int/job/1", Some("Engineer"), "ICT"),
            job("https://reliefweb.int/job/2", Some("Analyst"), "ICT"),
        ];

        for block in format_message(&jobs).split("\n\n") {
            let lines: Vec<_> = block.lines().collect();
            assert_eq!(lines.len(), 6);
            for line in &lines[..5] {
                assert!(line.ends_with("  "), "no hard break after {:?}", line);
            }
            assert!(!lines[5].ends_with(' '));
        }
    }

    #[test]
    fn missing_fields_have_placeholders() {
        let mut untitled = job("https://reliefweb.int/job/2", None, "ICT");
        untitled.published = None;
        untitled.author = None;

        let block = format_job(&untitled);
        assert!(block.contains("Title: (untitled)"));
        assert!(block.contains("Published: unknown"));
        assert!(block.contains("Author: unknown"));
    }

    #[test]
    fn blocks_are_separated_by_a_blank_line() {
        let jobs = vec![
            job("https://reliefweb.int/job/1", Some("Engineer"), "ICT"),
            job("https://reliefweb.int/job/2", Some("Analyst"), "ICT"),
        ];

        let message = format_message(&jobs);
        let blocks: Vec<_> = message.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[1].starts_with("Title: Analyst"));
    }

    #[test]
    fn tags_are_distinct_categories() {
        let jobs = vec![
            job("a", Some("A"), "ICT"),
            job("b", Some("B"), "Logistics"),
            job("c", Some("C"), "ICT"),
        ];

        assert_eq!(category_tags(&jobs), vec!["ICT", "Logistics"]);
    }

    #[tokio::test]
    async fn empty_batch_sends_nothing() {
        let test_deps = TestDependencies::new();

        let ids = notify_jobs("Jobs", &[], &test_deps.deps()).await.unwrap();

        assert!(ids.is_empty());
        assert_eq!(test_deps.notifier.sent_count(), 0);
    }

    #[tokio::test]
    async fn returns_ids_of_included_jobs() {
        let test_deps = TestDependencies::new();
        let jobs = vec![job("a", Some("A"), "ICT"), job("b", Some("B"), "ICT")];

        let ids = notify_jobs("Jobs from Relief Web", &jobs, &test_deps.deps())
            .await
            .unwrap();

        assert_eq!(ids, vec![jobs[0].id, jobs[1].id]);

        let sent = test_deps.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].title, "Jobs from Relief Web");
        assert_eq!(sent[0].priority, Priority::HIGH);
        assert_eq!(sent[0].tags, vec!["ICT"]);
        assert!(sent[0].markdown);
    }

    #[tokio::test]
    async fn transport_failure_is_a_notify_error() {
        let test_deps = TestDependencies::new();
        test_deps.notifier.set_failing(true);
        let jobs = vec![job("a", Some("A"), "ICT")];

        let err = notify_jobs("Jobs", &jobs, &test_deps.deps()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Notify(_)));
    }
}
