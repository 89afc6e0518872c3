//! Full-replace writes and full-table reads of the listings table.

use shelfwatch_core::BookListing;
use sqlx::PgConnection;

use crate::{checked_table_name, DbError};

/// A row read back from the listings table. Every scraped column is text;
/// typed coercion happens in the analysis layer.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredListing {
    pub id: i32,
    pub title: String,
    pub authors: Option<String>,
    pub price: Option<String>,
    pub rating: Option<String>,
    pub reviews_count: Option<String>,
    pub format: Option<String>,
}

pub(crate) fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {table}")
}

pub(crate) fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE {table} (\
         id SERIAL PRIMARY KEY, \
         title TEXT NOT NULL, \
         authors TEXT, \
         price TEXT, \
         rating TEXT, \
         reviews_count TEXT, \
         format TEXT)"
    )
}

pub(crate) fn insert_sql(table: &str) -> String {
    format!(
        "INSERT INTO {table} (title, authors, price, rating, reviews_count, format) \
         VALUES ($1, $2, $3, $4, $5, $6)"
    )
}

pub(crate) fn select_sql(table: &str) -> String {
    format!(
        "SELECT id, title, authors, price, rating, reviews_count, format \
         FROM {table} ORDER BY id"
    )
}

/// Drops and recreates `table`, then inserts `listings` in order.
///
/// The three steps are not wrapped in a transaction: a concurrent reader may
/// see the table missing or half-filled. Rows inserted before a failure stay
/// in place. Returns the number of rows inserted.
///
/// # Errors
///
/// - [`DbError::InvalidTableName`] if `table` is not a plain identifier.
/// - [`DbError::Query`] if the drop or create fails.
/// - [`DbError::PartialInsert`] if an insert fails; `inserted` counts the rows
///   already written.
pub async fn replace_listings(
    conn: &mut PgConnection,
    table: &str,
    listings: &[BookListing],
) -> Result<usize, DbError> {
    let table = checked_table_name(table)?;

    sqlx::query(&drop_table_sql(table))
        .execute(&mut *conn)
        .await?;
    sqlx::query(&create_table_sql(table))
        .execute(&mut *conn)
        .await?;

    let insert = insert_sql(table);
    let mut inserted = 0usize;
    for listing in listings {
        sqlx::query(&insert)
            .bind(&listing.title)
            .bind(&listing.author)
            .bind(&listing.price_raw)
            .bind(&listing.rating_raw)
            .bind(&listing.reviews_count_raw)
            .bind(&listing.format_raw)
            .execute(&mut *conn)
            .await
            .map_err(|source| DbError::PartialInsert { inserted, source })?;
        inserted += 1;
    }

    tracing::info!(table, rows = inserted, "replaced listings table");
    Ok(inserted)
}

/// Reads every row of `table` ordered by `id`.
///
/// # Errors
///
/// - [`DbError::InvalidTableName`] if `table` is not a plain identifier.
/// - [`DbError::Query`] if the select fails, including when the table does not
///   exist because an ingestion run is between drop and create.
pub async fn list_listings(
    conn: &mut PgConnection,
    table: &str,
) -> Result<Vec<StoredListing>, DbError> {
    let table = checked_table_name(table)?;
    let rows = sqlx::query_as::<_, StoredListing>(&select_sql(table))
        .fetch_all(&mut *conn)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_table_uses_fixed_schema() {
        let sql = create_table_sql("books");
        assert!(sql.starts_with("CREATE TABLE books ("));
        for column in [
            "id SERIAL PRIMARY KEY",
            "title TEXT NOT NULL",
            "authors TEXT",
            "price TEXT",
            "rating TEXT",
            "reviews_count TEXT",
            "format TEXT",
        ] {
            assert!(sql.contains(column), "missing {column} in {sql}");
        }
    }

    #[test]
    fn select_orders_by_id() {
        assert!(select_sql("books").ends_with("FROM books ORDER BY id"));
    }

    #[test]
    fn insert_binds_six_columns() {
        let sql = insert_sql("shelf");
        assert!(sql.starts_with("INSERT INTO shelf "));
        assert!(sql.contains("$6"));
        assert!(!sql.contains("$7"));
    }

    #[test]
    fn drop_tolerates_missing_table() {
        assert_eq!(drop_table_sql("books"), "DROP TABLE IF EXISTS books");
    }
}
