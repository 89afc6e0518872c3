use serde::Serialize;

use crate::coerce::CoercedListing;

/// Headline numbers for the analysis view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Mean of the coercible prices, rounded to 2 dp. `None` when no price coerced.
    pub average_price: Option<f64>,
    pub average_rating: Option<f64>,
    pub total_reviews: i64,
    pub most_common_format: Option<String>,
    pub row_count: usize,
}

/// Computes the summary over `rows`. Absent values are skipped, never counted
/// as zero.
#[must_use]
pub fn compute_summary(rows: &[CoercedListing]) -> AnalysisSummary {
    let total_reviews: f64 = rows.iter().filter_map(|r| r.reviews_count).sum();

    AnalysisSummary {
        average_price: rounded_mean(rows.iter().filter_map(|r| r.price)),
        average_rating: rounded_mean(rows.iter().filter_map(|r| r.rating)),
        total_reviews: truncate_to_i64(total_reviews),
        most_common_format: most_common(rows.iter().filter_map(|r| r.format.as_deref())),
        row_count: rows.len(),
    }
}

#[allow(clippy::cast_precision_loss)]
fn rounded_mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0_f64, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        return None;
    }
    let mean = sum / count as f64;
    Some((mean * 100.0).round() / 100.0)
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_to_i64(value: f64) -> i64 {
    value.trunc() as i64
}

/// Most frequent label. Ties go to the label seen first.
fn most_common<'a>(labels: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for label in labels {
        match counts.iter_mut().find(|(seen, _)| *seen == label) {
            Some((_, n)) => *n += 1,
            None => counts.push((label, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (label, n) in counts {
        if best.is_none_or(|(_, top)| n > top) {
            best = Some((label, n));
        }
    }
    best.map(|(label, _)| label.to_string())
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
