//! Run one reminder cycle over pending jobs.

use anyhow::{Context, Result};
use job_alerts_core::kernel::JobAlertDeps;
use job_alerts_core::telemetry::init_tracing;
use job_alerts_core::{Config, FlowOutcome, Pipeline};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;
    let deps = JobAlertDeps::from_config(&config).context("Failed to build dependencies")?;
    let pipeline = Pipeline::new(config, deps);

    tracing::info!(
        cap = pipeline.config().reminders.cap,
        "Starting reminder cycle"
    );

    match pipeline.run_reminders().await.context("Reminder cycle failed")? {
        FlowOutcome::Completed(report) => {
            tracing::info!("Sent reminders for {} jobs", report.reminded.len());
        }
        FlowOutcome::AlreadyRunning => {
            tracing::info!("Reminder cycle already running elsewhere");
        }
    }

    Ok(())
}
