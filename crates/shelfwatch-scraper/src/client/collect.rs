//! Multi-page listing collection for `SearchClient`.

use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;
use shelfwatch_core::BookListing;

use crate::dedup::ListingAccumulator;
use crate::error::ScraperError;
use crate::parse::parse_results_page;

use super::SearchClient;

/// Limits for one collection pass.
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Highest page number to request.
    pub max_pages: u32,
    /// Stop once this many distinct listings are held.
    pub target_items: usize,
    /// Inclusive range of whole seconds to pause before each page after the first.
    pub page_delay_secs: RangeInclusive<u64>,
}

impl CollectOptions {
    #[must_use]
    pub fn from_config(config: &shelfwatch_core::AppConfig) -> Self {
        Self {
            max_pages: config.max_pages,
            target_items: config.target_items,
            page_delay_secs: config.page_delay_secs(),
        }
    }
}

/// Why the page loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    TargetReached,
    PageCap,
    NoResults,
    FetchFailed,
}

impl StopReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StopReason::TargetReached => "target_reached",
            StopReason::PageCap => "page_cap",
            StopReason::NoResults => "no_results",
            StopReason::FetchFailed => "fetch_failed",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of a collection pass. Always carries whatever was gathered, even
/// when a page fetch failed part-way.
#[derive(Debug)]
pub struct CollectOutcome {
    pub listings: Vec<BookListing>,
    pub pages_fetched: u32,
    pub containers_seen: usize,
    pub containers_skipped: usize,
    pub duplicates_dropped: usize,
    pub stop_reason: StopReason,
    /// The fetch error that ended the loop, when `stop_reason` is `FetchFailed`.
    pub fetch_error: Option<ScraperError>,
}

impl SearchClient {
    /// Walks results pages from 1 to `options.max_pages`, accumulating distinct
    /// listings.
    ///
    /// The loop ends when the target count is reached, the page cap is hit, a
    /// page has no result containers, or a fetch fails. A failed fetch does not
    /// discard listings from earlier pages: the caller persists what was
    /// collected.
    pub async fn collect_listings(&self, options: &CollectOptions) -> CollectOutcome {
        let mut accumulator = ListingAccumulator::new();
        let mut pages_fetched = 0u32;
        let mut containers_seen = 0usize;
        let mut containers_skipped = 0usize;
        let mut fetch_error = None;
        let mut stop_reason = StopReason::PageCap;

        for page in 1..=options.max_pages {
            if accumulator.len() >= options.target_items {
                stop_reason = StopReason::TargetReached;
                break;
            }

            if page > 1 {
                pause_between_pages(&options.page_delay_secs).await;
            }

            let body = match self.fetch_results_page(page).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(page, error = %e, "results page fetch failed; ending run early");
                    fetch_error = Some(e);
                    stop_reason = StopReason::FetchFailed;
                    break;
                }
            };
            pages_fetched += 1;

            let parsed = parse_results_page(&body, &self.extractors);
            containers_seen += parsed.containers;
            containers_skipped += parsed.skipped;
            tracing::info!(
                page,
                containers = parsed.containers,
                listings = parsed.listings.len(),
                "parsed results page"
            );

            if parsed.containers == 0 {
                tracing::info!(page, "no more results");
                stop_reason = StopReason::NoResults;
                break;
            }

            for listing in parsed.listings {
                if accumulator.len() >= options.target_items {
                    break;
                }
                accumulator.push(listing);
            }
        }

        if stop_reason == StopReason::PageCap && accumulator.len() >= options.target_items {
            stop_reason = StopReason::TargetReached;
        }

        CollectOutcome {
            pages_fetched,
            containers_seen,
            containers_skipped,
            duplicates_dropped: accumulator.duplicates_dropped(),
            stop_reason,
            fetch_error,
            listings: accumulator.into_listings(),
        }
    }
}

async fn pause_between_pages(range: &RangeInclusive<u64>) {
    let secs = if range.is_empty() {
        0
    } else {
        rand::rng().random_range(range.clone())
    };
    if secs > 0 {
        tracing::debug!(delay_secs = secs, "pausing before next results page");
        tokio::time::sleep(Duration::from_secs(secs)).await;
    }
}
