//! Ingestion command handlers: a single run, or the periodic scheduler.

use std::sync::Arc;

use shelfwatch_core::AppConfig;
use shelfwatch_pipeline::{IngestionReport, RunStatus, INGEST_TASK};
use tokio::sync::watch;

/// Runs one ingestion pass and prints its report.
///
/// # Errors
///
/// Returns an error only if the report cannot be serialized. Fetch and
/// persist failures are part of the printed report.
pub(crate) async fn run_ingest(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let report = shelfwatch_pipeline::run_ingestion(config).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }
    Ok(())
}

fn format_report(report: &IngestionReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("pages fetched:       {}\n", report.pages_fetched));
    out.push_str(&format!("containers seen:     {}\n", report.containers_seen));
    out.push_str(&format!("containers skipped:  {}\n", report.containers_skipped));
    out.push_str(&format!("duplicates dropped:  {}\n", report.duplicates_dropped));
    out.push_str(&format!("listings collected:  {}\n", report.listings_collected));
    out.push_str(&format!("rows persisted:      {}\n", report.rows_persisted));
    out.push_str(&format!("stopped because:     {}\n", report.stop_reason));
    if let Some(e) = &report.fetch_error {
        out.push_str(&format!("fetch error:         {e}\n"));
    }
    if let Some(e) = &report.persist_error {
        out.push_str(&format!("persist error:       {e}\n"));
    }
    out
}

/// Runs the ingestion scheduler in the foreground until Ctrl-C, then waits
/// for any in-progress run to finish.
///
/// # Errors
///
/// Returns an error if the Ctrl-C handler cannot be installed or the
/// scheduler task panicked.
pub(crate) async fn run_schedule(config: AppConfig) -> anyhow::Result<()> {
    let (shutdown, rx) = watch::channel(false);
    let status = RunStatus::handle(INGEST_TASK);
    let handle = shelfwatch_pipeline::spawn_ingestion_scheduler(Arc::new(config), status, rx);

    tokio::signal::ctrl_c().await?;
    println!("stopping scheduler; waiting for any in-progress run");
    let _ = shutdown.send(true);
    handle.await?;
    Ok(())
}
