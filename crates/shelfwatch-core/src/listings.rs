use serde::{Deserialize, Serialize};

/// Stored when a listing has no author link.
pub const DEFAULT_AUTHOR: &str = "Unknown";
/// Stored when a listing has no price element.
pub const DEFAULT_PRICE: &str = "N/A";
/// Stored when a listing has no star-rating element.
pub const DEFAULT_RATING: &str = "N/A";
/// Stored when a listing has no review-count element.
pub const DEFAULT_REVIEWS_COUNT: &str = "0";
/// Stored when a listing has no format label.
pub const DEFAULT_FORMAT: &str = "Unknown";

/// One book from a search-results page, with every field kept as the text
/// that was scraped. Typed coercion happens only at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookListing {
    /// Non-empty; the dedup key within one ingestion run.
    pub title: String,
    pub author: String,
    /// Currency-formatted text such as `"29."`, or `"N/A"`.
    pub price_raw: String,
    /// Descriptive text such as `"4.5 out of 5 stars"`, or `"N/A"`.
    pub rating_raw: String,
    pub reviews_count_raw: String,
    pub format_raw: String,
}

impl BookListing {
    /// Builds a listing from the title and optional scraped fields, filling
    /// each missing field with its documented default.
    #[must_use]
    pub fn with_defaults(
        title: String,
        author: Option<String>,
        price: Option<String>,
        rating: Option<String>,
        reviews_count: Option<String>,
        format: Option<String>,
    ) -> Self {
        Self {
            title,
            author: author.unwrap_or_else(|| DEFAULT_AUTHOR.to_string()),
            price_raw: price.unwrap_or_else(|| DEFAULT_PRICE.to_string()),
            rating_raw: rating.unwrap_or_else(|| DEFAULT_RATING.to_string()),
            reviews_count_raw: reviews_count.unwrap_or_else(|| DEFAULT_REVIEWS_COUNT.to_string()),
            format_raw: format.unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
        }
    }
}
