//! Apply database migrations.

use anyhow::{Context, Result};
use job_alerts_core::kernel::{db, MIGRATOR};
use job_alerts_core::telemetry::init_tracing;
use job_alerts_core::Config;
use sqlx::Connection;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Config::from_env().context("Failed to load configuration")?;

    tracing::info!("Connecting to database...");
    let mut conn = db::connect(&config.database)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running database migrations...");
    let result = MIGRATOR.run(&mut conn).await;
    conn.close().await.ok();
    result.context("Failed to run migrations")?;

    tracing::info!("Migrations complete");
    Ok(())
}
