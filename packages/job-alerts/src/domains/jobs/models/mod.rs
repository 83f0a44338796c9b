pub mod job;
pub mod reminder;

pub use job::{dedupe_by_link, ApplicationStatus, Job, JobRecord};
pub use reminder::Reminder;
