//! Parsing of a whole search-results page.

use std::sync::LazyLock;

use scraper::{Html, Selector};
use shelfwatch_core::BookListing;

use crate::extract::ExtractorSet;

static RESULT_ITEM: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.s-result-item").expect("static selector must be valid CSS")
});

/// Listings found on one results page.
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Result containers on the page, valid or not. Zero means the search has
    /// run out of results.
    pub containers: usize,
    /// Containers that failed the acceptance rule.
    pub skipped: usize,
    /// Accepted listings in page order, not yet deduplicated.
    pub listings: Vec<BookListing>,
}

/// Extracts every listing container from `html`.
///
/// Containers that fail extraction are logged at debug level and counted in
/// [`ParsedPage::skipped`]; they never abort the page.
#[must_use]
pub fn parse_results_page(html: &str, extractors: &ExtractorSet) -> ParsedPage {
    let document = Html::parse_document(html);
    let mut page = ParsedPage::default();

    for container in document.select(&RESULT_ITEM) {
        page.containers += 1;
        match extractors.extract(container).into_listing() {
            Ok(listing) => page.listings.push(listing),
            Err(e) if e.is_parse_failure() => {
                tracing::debug!(container = page.containers, error = %e, "skipping result container");
                page.skipped += 1;
            }
            Err(e) => {
                tracing::warn!(container = page.containers, error = %e, "unexpected extraction error");
                page.skipped += 1;
            }
        }
    }

    page
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
