//! First-occurrence-wins accumulation of listings across result pages.

use std::collections::HashSet;

use shelfwatch_core::BookListing;

/// Collects listings in arrival order, dropping any whose title was already
/// seen in this run. Titles compare exactly.
#[derive(Debug, Default)]
pub struct ListingAccumulator {
    seen_titles: HashSet<String>,
    listings: Vec<BookListing>,
    duplicates_dropped: usize,
}

impl ListingAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `listing` unless its title is already held. Returns `true` when
    /// the listing was kept.
    pub fn push(&mut self, listing: BookListing) -> bool {
        if self.seen_titles.contains(&listing.title) {
            self.duplicates_dropped += 1;
            return false;
        }
        self.seen_titles.insert(listing.title.clone());
        self.listings.push(listing);
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    #[must_use]
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    #[must_use]
    pub fn into_listings(self) -> Vec<BookListing> {
        self.listings
    }
}
