use shelfwatch_analysis::CoercedListing;
use shelfwatch_core::AppConfig;

use crate::PipelineError;

/// Reads the whole listings table over a fresh connection and coerces every
/// row.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] if the connection fails or the table
/// cannot be read, including while an ingestion run has it dropped.
pub async fn load_and_coerce(config: &AppConfig) -> Result<Vec<CoercedListing>, PipelineError> {
    let mut conn = shelfwatch_db::connect(&config.database_url, config.db_connect_timeout())
        .await
        .inspect_err(|e| tracing::warn!(error = %e, "presentation: connect failed"))?;

    let result = shelfwatch_db::list_listings(&mut conn, &config.table_name).await;
    shelfwatch_db::close(conn).await;

    let rows = result.inspect_err(
        |e| tracing::warn!(table = %config.table_name, error = %e, "presentation: read failed"),
    )?;

    Ok(rows.into_iter().map(CoercedListing::from_stored).collect())
}

/// Opens a connection and pings it.
///
/// # Errors
///
/// Returns [`PipelineError::Store`] if the store is unreachable or the ping fails.
pub async fn check_store(config: &AppConfig) -> Result<(), PipelineError> {
    let mut conn =
        shelfwatch_db::connect(&config.database_url, config.db_connect_timeout()).await?;
    let result = shelfwatch_db::ping(&mut conn).await;
    shelfwatch_db::close(conn).await;
    Ok(result?)
}
