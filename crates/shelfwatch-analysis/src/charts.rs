//! Data behind the three dashboard charts. Rendering happens elsewhere.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::coerce::CoercedListing;

pub const PRICE_BINS: usize = 20;
pub const RATING_BINS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormatReviews {
    pub format: String,
    pub total_reviews: i64,
}

/// Splits `[min, max]` of `values` into `bins` equal-width bins. The last bin
/// is closed on the right so the maximum is counted. When every value is the
/// same the range is widened to `[v - 0.5, v + 0.5]`.
#[must_use]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = if (max - min).abs() < f64::EPSILON {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    };
    let width = (hi - lo) / bins as f64;

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            lower: lo + width * i as f64,
            upper: if i + 1 == bins {
                hi
            } else {
                lo + width * (i + 1) as f64
            },
            count,
        })
        .collect()
}

#[must_use]
pub fn price_histogram(rows: &[CoercedListing]) -> Vec<HistogramBin> {
    let prices: Vec<f64> = rows.iter().filter_map(|r| r.price).collect();
    histogram(&prices, PRICE_BINS)
}

#[must_use]
pub fn rating_histogram(rows: &[CoercedListing]) -> Vec<HistogramBin> {
    let ratings: Vec<f64> = rows.iter().filter_map(|r| r.rating).collect();
    histogram(&ratings, RATING_BINS)
}

/// Sums present review counts per format label, sorted by label. A format
/// whose rows have no coercible count still appears with a total of zero.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn reviews_by_format(rows: &[CoercedListing]) -> Vec<FormatReviews> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for row in rows {
        if let Some(format) = row.format.as_deref() {
            *totals.entry(format).or_insert(0.0) += row.reviews_count.unwrap_or(0.0);
        }
    }

    totals
        .into_iter()
        .map(|(format, total)| FormatReviews {
            format: format.to_string(),
            total_reviews: total.trunc() as i64,
        })
        .collect()
}
