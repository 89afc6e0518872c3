//! One ingestion run: collect listings from the search pages, then replace
//! the listings table with them.

use serde::Serialize;
use shelfwatch_core::{AppConfig, BookListing};
use shelfwatch_db::DbError;
use shelfwatch_scraper::{CollectOptions, CollectOutcome, SearchClient, StopReason};

use crate::supervisor::JobReport;

/// What one ingestion run did. Errors are recorded here rather than returned:
/// a run always finishes, with zero, partial or full data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestionReport {
    pub pages_fetched: u32,
    pub containers_seen: usize,
    pub containers_skipped: usize,
    pub duplicates_dropped: usize,
    pub listings_collected: usize,
    pub rows_persisted: usize,
    pub stop_reason: &'static str,
    pub fetch_error: Option<String>,
    pub persist_error: Option<String>,
}

impl IngestionReport {
    fn from_outcome(outcome: &CollectOutcome) -> Self {
        Self {
            pages_fetched: outcome.pages_fetched,
            containers_seen: outcome.containers_seen,
            containers_skipped: outcome.containers_skipped,
            duplicates_dropped: outcome.duplicates_dropped,
            listings_collected: outcome.listings.len(),
            rows_persisted: 0,
            stop_reason: outcome.stop_reason.as_str(),
            fetch_error: outcome.fetch_error.as_ref().map(ToString::to_string),
            persist_error: None,
        }
    }

    fn client_failed(error: String) -> Self {
        Self {
            pages_fetched: 0,
            containers_seen: 0,
            containers_skipped: 0,
            duplicates_dropped: 0,
            listings_collected: 0,
            rows_persisted: 0,
            stop_reason: StopReason::FetchFailed.as_str(),
            fetch_error: Some(error),
            persist_error: None,
        }
    }

    /// `true` when neither fetching nor persisting hit an error.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.fetch_error.is_none() && self.persist_error.is_none()
    }

    /// Condenses the report into the scheduler's last-run status.
    #[must_use]
    pub fn job_report(&self) -> JobReport {
        if self.is_clean() {
            return JobReport::succeeded(self.rows_persisted);
        }
        let error = [&self.fetch_error, &self.persist_error]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("; ");
        JobReport::failed(self.rows_persisted, error)
    }
}

/// Runs one full ingestion pass against `config`.
///
/// Pages are fetched until the target count, the page cap, an empty page or a
/// fetch failure. Whatever was collected then replaces the listings table. A
/// run that collected nothing leaves the table as it was.
pub async fn run_ingestion(config: &AppConfig) -> IngestionReport {
    tracing::info!(
        search_terms = %config.search_terms,
        max_pages = config.max_pages,
        target_items = config.target_items,
        "ingest: starting run"
    );

    let client = match SearchClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!(error = %e, "ingest: could not build search client");
            return IngestionReport::client_failed(e.to_string());
        }
    };

    let outcome = client
        .collect_listings(&CollectOptions::from_config(config))
        .await;
    let mut report = IngestionReport::from_outcome(&outcome);

    if outcome.listings.is_empty() {
        tracing::warn!(
            stop_reason = report.stop_reason,
            "ingest: no listings collected; table left unchanged"
        );
        return report;
    }

    match persist(config, &outcome.listings).await {
        Ok(rows) => report.rows_persisted = rows,
        Err(e) => {
            if let DbError::PartialInsert { inserted, .. } = &e {
                report.rows_persisted = *inserted;
            }
            tracing::error!(
                table = %config.table_name,
                rows_persisted = report.rows_persisted,
                error = %e,
                "ingest: failed to persist listings"
            );
            report.persist_error = Some(e.to_string());
        }
    }

    if report.is_clean() {
        tracing::info!(
            pages = report.pages_fetched,
            collected = report.listings_collected,
            persisted = report.rows_persisted,
            stop_reason = report.stop_reason,
            "ingest: run complete"
        );
    } else {
        tracing::warn!(
            pages = report.pages_fetched,
            collected = report.listings_collected,
            persisted = report.rows_persisted,
            stop_reason = report.stop_reason,
            "ingest: run finished with errors"
        );
    }
    report
}

async fn persist(config: &AppConfig, listings: &[BookListing]) -> Result<usize, DbError> {
    let mut conn =
        shelfwatch_db::connect(&config.database_url, config.db_connect_timeout()).await?;
    let result = shelfwatch_db::replace_listings(&mut conn, &config.table_name, listings).await;
    shelfwatch_db::close(conn).await;
    result
}
