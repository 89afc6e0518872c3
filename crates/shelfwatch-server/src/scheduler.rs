//! Background schedulers owned by the server process.
//!
//! Starts the ingestion loop and the presentation refresh loop side by side.
//! Both share one shutdown channel; [`Schedulers::stop`] signals it and waits
//! for each loop to exit.

use std::sync::Arc;

use shelfwatch_core::AppConfig;
use shelfwatch_pipeline::{
    spawn_ingestion_scheduler, spawn_refresh_scheduler, RunStatus, StatusHandle, INGEST_TASK,
    REFRESH_TASK,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct Schedulers {
    shutdown: watch::Sender<bool>,
    ingest: JoinHandle<()>,
    refresh: JoinHandle<()>,
    ingest_status: StatusHandle,
    refresh_status: StatusHandle,
}

impl Schedulers {
    /// Spawns both loops. Each runs its first pass immediately.
    pub fn start(config: Arc<AppConfig>) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let ingest_status = RunStatus::handle(INGEST_TASK);
        let refresh_status = RunStatus::handle(REFRESH_TASK);

        let ingest =
            spawn_ingestion_scheduler(Arc::clone(&config), Arc::clone(&ingest_status), rx.clone());
        let refresh = spawn_refresh_scheduler(config, Arc::clone(&refresh_status), rx);

        Self {
            shutdown,
            ingest,
            refresh,
            ingest_status,
            refresh_status,
        }
    }

    pub fn ingest_status(&self) -> StatusHandle {
        Arc::clone(&self.ingest_status)
    }

    pub fn refresh_status(&self) -> StatusHandle {
        Arc::clone(&self.refresh_status)
    }

    /// Signals both loops and waits for them. A run in progress finishes first.
    pub async fn stop(self) {
        // Receivers also observe a dropped sender, so a send error is harmless.
        let _ = self.shutdown.send(true);
        for (task, handle) in [(INGEST_TASK, self.ingest), (REFRESH_TASK, self.refresh)] {
            if let Err(e) = handle.await {
                tracing::error!(task, error = %e, "scheduler: task ended abnormally");
            }
        }
        tracing::info!("scheduler: all tasks stopped");
    }
}
