//! Typed views over stored listings: column coercion, summary statistics and
//! the datasets behind the dashboard charts.

mod charts;
mod coerce;
mod summary;

use serde::Serialize;

pub use charts::{
    histogram, price_histogram, rating_histogram, reviews_by_format, FormatReviews, HistogramBin,
    PRICE_BINS, RATING_BINS,
};
pub use coerce::{coerce_price, coerce_rating, coerce_reviews, title_case, CoercedListing};
pub use summary::{compute_summary, AnalysisSummary};

/// Everything the "Analyze Data" view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summary: AnalysisSummary,
    pub price_histogram: Vec<HistogramBin>,
    pub rating_histogram: Vec<HistogramBin>,
    pub reviews_by_format: Vec<FormatReviews>,
}

#[must_use]
pub fn analyze(rows: &[CoercedListing]) -> AnalysisReport {
    AnalysisReport {
        summary: compute_summary(rows),
        price_histogram: price_histogram(rows),
        rating_histogram: rating_histogram(rows),
        reviews_by_format: reviews_by_format(rows),
    }
}
