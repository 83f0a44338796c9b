pub mod extract;
pub mod ingest;
pub mod notify;
pub mod remind;

pub use extract::{extract_jobs, parse_feed};
pub use ingest::{ingest_feed, IngestReport};
pub use notify::{format_job, format_message, notify_jobs, notify_selected, JobSelector};
pub use remind::{run_reminder_cycle, ReminderReport};
