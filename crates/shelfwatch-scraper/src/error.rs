use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid search URL \"{url}\": {reason}")]
    InvalidSearchUrl { url: String, reason: String },

    #[error("result container has no title")]
    MissingTitle,

    #[error("listing \"{title}\" has neither an author nor a rating")]
    IncompleteListing { title: String },
}

impl ScraperError {
    /// `true` for per-container extraction failures, which skip one item
    /// rather than abort the run.
    #[must_use]
    pub fn is_parse_failure(&self) -> bool {
        matches!(
            self,
            ScraperError::MissingTitle | ScraperError::IncompleteListing { .. }
        )
    }
}
