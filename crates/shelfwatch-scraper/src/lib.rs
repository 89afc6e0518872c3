//! Search-results scraping: fetch pages, extract listing fields, and
//! accumulate distinct listings across pages.

pub mod client;
pub mod dedup;
pub mod error;
pub mod extract;
pub mod parse;
mod rate_limit;

pub use client::{CollectOptions, CollectOutcome, SearchClient, StopReason};
pub use dedup::ListingAccumulator;
pub use error::ScraperError;
pub use extract::{ExtractedFields, ExtractorSet, Field, FieldExtractor, SelectorExtractor};
pub use parse::{parse_results_page, ParsedPage};
