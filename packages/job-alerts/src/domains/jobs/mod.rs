//! Job postings: storage, notification, and reminders.

pub mod activities;
pub mod models;

pub use activities::{IngestReport, JobSelector, ReminderReport};
pub use models::{ApplicationStatus, Job, JobRecord, Reminder};
