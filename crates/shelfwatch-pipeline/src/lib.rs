//! The two pipelines that share the listings table, and the supervised
//! periodic task that drives each of them.

mod error;
mod ingest;
mod present;
pub mod supervisor;

use std::sync::Arc;

use shelfwatch_core::AppConfig;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub use error::PipelineError;
pub use ingest::{run_ingestion, IngestionReport};
pub use present::{check_store, load_and_coerce};
pub use supervisor::{spawn_periodic, JobReport, RunOutcome, RunStatus, StatusHandle};

pub const INGEST_TASK: &str = "ingest";
pub const REFRESH_TASK: &str = "refresh";

/// Starts the ingestion loop: one run immediately, then one every
/// `config.ingest_interval()` until `shutdown` fires.
pub fn spawn_ingestion_scheduler(
    config: Arc<AppConfig>,
    status: StatusHandle,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let interval = config.ingest_interval();
    spawn_periodic(interval, status, shutdown, move || {
        let config = Arc::clone(&config);
        async move { run_ingestion(&config).await.job_report() }
    })
}

/// Starts the presentation refresh loop, which re-reads the table on its own
/// interval and logs how many rows it found.
pub fn spawn_refresh_scheduler(
    config: Arc<AppConfig>,
    status: StatusHandle,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let interval = config.refresh_interval();
    spawn_periodic(interval, status, shutdown, move || {
        let config = Arc::clone(&config);
        async move {
            match load_and_coerce(&config).await {
                Ok(rows) => {
                    tracing::info!(rows = rows.len(), "refresh: listings table read");
                    JobReport::succeeded(rows.len())
                }
                Err(e) => JobReport::failed(0, e.to_string()),
            }
        }
    })
}
