//! Supervised periodic task.
//!
//! Each task runs its job once at start, then sleeps `interval` between the
//! end of one run and the start of the next, so runs never overlap. A
//! shutdown signal wakes the sleep immediately; a run already in progress is
//! allowed to finish.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    NeverRun,
    Running,
    Succeeded,
    Failed,
}

/// Last-run bookkeeping for one periodic task, shared with the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct RunStatus {
    pub task: String,
    pub runs_started: u64,
    pub last_started_at: Option<DateTime<Utc>>,
    pub last_finished_at: Option<DateTime<Utc>>,
    pub last_outcome: RunOutcome,
    /// Rows persisted (ingestion) or rows loaded (refresh) by the last run.
    pub last_records: Option<usize>,
    pub last_error: Option<String>,
}

impl RunStatus {
    #[must_use]
    pub fn new(task: &str) -> Self {
        Self {
            task: task.to_string(),
            runs_started: 0,
            last_started_at: None,
            last_finished_at: None,
            last_outcome: RunOutcome::NeverRun,
            last_records: None,
            last_error: None,
        }
    }

    /// Wraps a fresh status in a shareable handle.
    #[must_use]
    pub fn handle(task: &str) -> StatusHandle {
        Arc::new(RwLock::new(Self::new(task)))
    }
}

pub type StatusHandle = Arc<RwLock<RunStatus>>;

/// What a job hands back to the supervisor after each run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub records: usize,
    pub error: Option<String>,
}

impl JobReport {
    #[must_use]
    pub fn succeeded(records: usize) -> Self {
        Self {
            records,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(records: usize, error: String) -> Self {
        Self {
            records,
            error: Some(error),
        }
    }
}

/// Spawns `job` on a fixed interval until `shutdown` changes or its sender
/// is dropped.
///
/// The job is invoked immediately, then again `interval` after each run
/// finishes. Its report is written into `status`.
pub fn spawn_periodic<F, Fut>(
    interval: Duration,
    status: StatusHandle,
    mut shutdown: watch::Receiver<bool>,
    mut job: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = JobReport> + Send + 'static,
{
    tokio::spawn(async move {
        let task = status.read().await.task.clone();
        tracing::info!(
            task = %task,
            interval_secs = interval.as_secs(),
            "scheduler: started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            mark_started(&status).await;
            let report = job().await;
            if let Some(error) = &report.error {
                tracing::error!(task = %task, error = %error, "scheduler: run failed");
            }
            mark_finished(&status, report).await;

            tokio::select! {
                () = tokio::time::sleep(interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        tracing::info!(task = %task, "scheduler: stopped");
    })
}

async fn mark_started(status: &StatusHandle) {
    let mut s = status.write().await;
    s.runs_started += 1;
    s.last_started_at = Some(Utc::now());
    s.last_outcome = RunOutcome::Running;
}

async fn mark_finished(status: &StatusHandle, report: JobReport) {
    let mut s = status.write().await;
    s.last_finished_at = Some(Utc::now());
    s.last_records = Some(report.records);
    s.last_outcome = if report.error.is_some() {
        RunOutcome::Failed
    } else {
        RunOutcome::Succeeded
    };
    s.last_error = report.error;
}
