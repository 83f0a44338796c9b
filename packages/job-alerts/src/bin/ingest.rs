//! Fetch the configured feed, store unseen jobs, and notify about them.

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

    tracing::info!(feed = %pipeline.config().feed.url, "Starting ingest");

    match pipeline.run_ingest().await.context("Ingest failed")? {
        FlowOutcome::Completed(report) => {
            tracing::info!(
                "Ingested {} jobs: {} new, {} notified",
                report.fetched,
                report.inserted.len(),
                report.notified.len()
            );
        }
        FlowOutcome::AlreadyRunning => {
            tracing::info!("Ingest already running elsewhere");
        }
    }

    Ok(())
}
