use std::time::Duration;

use sqlx::{Connection, PgConnection};
use thiserror::Error;

pub mod listings;

pub use listings::{list_listings, replace_listings, StoredListing};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("could not connect to the row store: {0}")]
    Connect(#[source] sqlx::Error),
    #[error("timed out after {secs}s connecting to the row store")]
    ConnectTimeout { secs: u64 },
    #[error("invalid table name \"{name}\": {reason}")]
    InvalidTableName { name: String, reason: String },
    #[error("insert failed after {inserted} rows: {source}")]
    PartialInsert {
        inserted: usize,
        #[source]
        source: sqlx::Error,
    },
    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

impl DbError {
    /// `true` when the row store could not be reached at all.
    #[must_use]
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, DbError::Connect(_) | DbError::ConnectTimeout { .. })
    }
}

/// Opens one Postgres connection, giving up after `timeout`.
///
/// Each ingestion run and each presentation load opens its own connection and
/// closes it when done; nothing is pooled.
///
/// # Errors
///
/// Returns [`DbError::Connect`] if the URL is invalid or the server refuses the
/// connection, or [`DbError::ConnectTimeout`] if `timeout` elapses first.
pub async fn connect(database_url: &str, timeout: Duration) -> Result<PgConnection, DbError> {
    match tokio::time::timeout(timeout, PgConnection::connect(database_url)).await {
        Ok(Ok(conn)) => Ok(conn),
        Ok(Err(e)) => Err(DbError::Connect(e)),
        Err(_) => Err(DbError::ConnectTimeout {
            secs: timeout.as_secs(),
        }),
    }
}

/// Send a `SELECT 1` to verify the connection is live.
///
/// # Errors
///
/// Returns [`DbError::Query`] if the query fails.
pub async fn ping(conn: &mut PgConnection) -> Result<(), DbError> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(&mut *conn)
        .await?;
    Ok(())
}

/// Closes a connection, logging rather than returning a failed goodbye.
pub async fn close(conn: PgConnection) {
    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "error closing row store connection");
    }
}

/// Checks that `table` is a plain SQL identifier before it is spliced into a
/// statement.
pub(crate) fn checked_table_name(table: &str) -> Result<&str, DbError> {
    shelfwatch_core::validate_table_name(table).map_err(|reason| DbError::InvalidTableName {
        name: table.to_owned(),
        reason,
    })?;
    Ok(table)
}
