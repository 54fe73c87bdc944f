//! Sigmill Worker
//!
//! Runs the expiry sweep on a cron cadence against the signal store.
//! Runs as a separate process from the message-ingestion service.

use apalis::prelude::*;
use apalis_cron::CronStream;
use backon::{ExponentialBuilder, Retryable};
use dotenvy::dotenv;
use sigmill::config::{self, EngineConfig};
use sigmill::db::PostgresSignalStore;
use sigmill::lifecycle::{handle_sweep, interval_schedule, ExpirySweeper};
use sigmill::logging;
use sigmill::metrics::Metrics;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let env = config::get_environment();
    let engine_config = EngineConfig::from_env();

    info!("Starting Sigmill Worker");
    info!(environment = %env, "Environment");
    info!(
        expiry_window = engine_config.expiry_window_secs,
        sweep_interval = engine_config.sweep_interval_secs,
        "Expiry sweep: every {}s, validity window {}s",
        engine_config.sweep_interval_secs,
        engine_config.expiry_window_secs
    );

    let metrics = Arc::new(Metrics::new()?);

    info!("Connecting to signal store...");
    let database_url = config::get_database_url();
    let store = (|| async { PostgresSignalStore::connect(&database_url).await })
        .retry(ExponentialBuilder::default())
        .notify(|err, dur| {
            warn!(error = %err, "store connection failed, retrying in {:?}", dur);
        })
        .await
        .map_err(|e| format!("signal store connection required for worker: {}", e))?;
    info!("Signal store connected");
    metrics.database_connected.set(1.0);

    let sweeper = Arc::new(
        ExpirySweeper::new(Arc::new(store), engine_config.expiry_window_secs)
            .with_metrics(metrics.clone()),
    );

    let schedule = interval_schedule(engine_config.sweep_interval_secs)
        .map_err(|e| format!("failed to build sweep schedule: {}", e))?;
    info!(cron = %schedule, "Sweep schedule ready");

    let worker = WorkerBuilder::new("expiry-sweeper")
        .data(sweeper)
        .backend(CronStream::new(schedule))
        .build_fn(handle_sweep);

    let worker_handle = tokio::spawn(async move {
        worker.run().await;
    });
    info!("Expiry sweeper started, waiting for shutdown signal...");

    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down worker...");
            worker_handle.abort();
            info!("Worker stopped");
        }
    }

    Ok(())
}
