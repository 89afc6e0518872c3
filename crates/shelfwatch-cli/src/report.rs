//! Read-only views of the listings table: `view` and `analyze`.

use anyhow::Context;
use shelfwatch_analysis::{AnalysisReport, CoercedListing, HistogramBin};
use shelfwatch_core::AppConfig;

const BAR_WIDTH: usize = 40;

/// Print the listings table with raw and coerced values.
///
/// # Errors
///
/// Returns an error if the table cannot be read.
pub(crate) async fn run_view(
    config: &AppConfig,
    json: bool,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let rows = load(config).await?;
    let shown = &rows[..limit.unwrap_or(rows.len()).min(rows.len())];

    if json {
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!(
            "table `{}` is empty; run `shelfwatch-cli ingest` first",
            config.table_name
        );
        return Ok(());
    }

    println!("data from `{}` ({} rows):", config.table_name, rows.len());
    println!(
        "{:<5}{:<52}{:<24}{:>9}{:>8}{:>10}  FORMAT",
        "ID", "TITLE", "AUTHOR", "PRICE", "RATING", "REVIEWS"
    );
    for row in shown {
        println!("{}", format_row(row));
    }
    Ok(())
}

/// Print summary statistics and chart data.
///
/// # Errors
///
/// Returns an error if the table cannot be read.
pub(crate) async fn run_analyze(config: &AppConfig, json: bool) -> anyhow::Result<()> {
    let rows = load(config).await?;
    let report = shelfwatch_analysis::analyze(&rows);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_analysis(&report));
    }
    Ok(())
}

async fn load(config: &AppConfig) -> anyhow::Result<Vec<CoercedListing>> {
    shelfwatch_pipeline::load_and_coerce(config)
        .await
        .with_context(|| format!("could not read table `{}`", config.table_name))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max - 3).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Format an optional number for display, with a dash when `None`.
fn fmt_num(value: Option<f64>) -> String {
    value.map_or_else(|| "\u{2014}".to_string(), |v| format!("{v:.2}"))
}

fn format_row(row: &CoercedListing) -> String {
    format!(
        "{:<5}{:<52}{:<24}{:>9}{:>8}{:>10}  {}",
        row.id,
        truncate(&row.title, 50),
        truncate(row.authors.as_deref().unwrap_or("\u{2014}"), 22),
        fmt_num(row.price),
        fmt_num(row.rating),
        row.reviews_count
            .map_or_else(|| "\u{2014}".to_string(), |v| format!("{v:.0}")),
        row.format.as_deref().unwrap_or("\u{2014}"),
    )
}

fn format_histogram(title: &str, bins: &[HistogramBin]) -> String {
    let mut out = format!("{title}\n");
    if bins.is_empty() {
        out.push_str("  (no values)\n");
        return out;
    }
    let peak = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in bins {
        let bar = "#".repeat(bin.count * BAR_WIDTH / peak);
        out.push_str(&format!(
            "  {:>8.2} - {:<8.2} {:>4} {bar}\n",
            bin.lower, bin.upper, bin.count
        ));
    }
    out
}

fn format_analysis(report: &AnalysisReport) -> String {
    let s = &report.summary;
    let mut out = String::from("analysis results:\n");
    out.push_str(&format!("  Average Price:      {}\n", fmt_num(s.average_price)));
    out.push_str(&format!("  Average Rating:     {}\n", fmt_num(s.average_rating)));
    out.push_str(&format!("  Total Reviews:      {}\n", s.total_reviews));
    out.push_str(&format!(
        "  Most Common Format: {}\n\n",
        s.most_common_format.as_deref().unwrap_or("\u{2014}")
    ));

    out.push_str(&format_histogram("Price Distribution", &report.price_histogram));
    out.push('\n');
    out.push_str(&format_histogram("Rating Distribution", &report.rating_histogram));
    out.push_str("\nReviews by Format\n");
    if report.reviews_by_format.is_empty() {
        out.push_str("  (no values)\n");
    }
    for entry in &report.reviews_by_format {
        out.push_str(&format!("  {:<30}{:>10}\n", entry.format, entry.total_reviews));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwatch_analysis::analyze;

    fn row(id: i32, title: &str, price: Option<f64>, format: Option<&str>) -> CoercedListing {
        CoercedListing {
            id,
            title: title.to_string(),
            authors: Some("Jane Author".to_string()),
            raw_price: None,
            raw_rating: None,
            raw_reviews_count: None,
            raw_format: None,
            price,
            rating: Some(4.5),
            reviews_count: Some(10.0),
            format: format.map(str::to_string),
        }
    }

    #[test]
    fn truncate_adds_ellipsis_past_limit() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghijkl", 10), "abcdefg...");
    }

    #[test]
    fn fmt_num_uses_dash_for_absent() {
        assert_eq!(fmt_num(None), "\u{2014}");
        assert_eq!(fmt_num(Some(4.5)), "4.50");
    }

    #[test]
    fn format_row_shows_placeholder_for_missing_values() {
        let line = format_row(&row(3, "Streaming Systems", None, None));
        assert!(line.starts_with("3    Streaming Systems"));
        assert!(line.contains("\u{2014}"));
    }

    #[test]
    fn analysis_text_lists_headline_numbers() {
        let rows = [
            row(1, "A", Some(10.0), Some("Paperback")),
            row(2, "B", Some(20.0), Some("Paperback")),
            row(3, "C", None, Some("Hardcover")),
        ];
        let text = format_analysis(&analyze(&rows));
        assert!(text.contains("Average Price:      15.00"));
        assert!(text.contains("Total Reviews:      30"));
        assert!(text.contains("Most Common Format: Paperback"));
        assert!(text.contains("Hardcover"));
    }

    #[test]
    fn empty_histogram_says_so() {
        let text = format_histogram("Price Distribution", &[]);
        assert!(text.contains("(no values)"));
    }
}
