// Job Alerts - Core
//
// Ingests job postings from an RSS feed, stores them deduplicated by link,
// and pushes new and still-pending postings to an ntfy topic until someone
// changes their application status.
//
// Invoked by an external scheduler through the `ingest` and `send_reminders`
// binaries; nothing here schedules itself.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;
pub mod pipeline;
pub mod telemetry;

pub use config::*;
pub use pipeline::{FlowOutcome, Pipeline};
