//! HTTP client for the retail search-results endpoint.

mod collect;

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};

use crate::error::ScraperError;
use crate::extract::ExtractorSet;
use crate::rate_limit::retry_with_backoff;

pub use collect::{CollectOptions, CollectOutcome, StopReason};

/// Fetches search-results pages with a fixed browser-like header set.
///
/// One client is built per ingestion run. Non-2xx responses come back as
/// [`ScraperError::UnexpectedStatus`]; transient failures are retried only
/// when `max_retries` is above zero.
pub struct SearchClient {
    pub(super) client: Client,
    pub(super) search_url: Url,
    pub(super) search_terms: String,
    pub(super) max_retries: u32,
    pub(super) backoff_base_secs: u64,
    pub(super) extractors: ExtractorSet,
}

impl SearchClient {
    /// Creates a `SearchClient` for `search_url` and `search_terms`.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidSearchUrl`] if `search_url` does not parse or
    ///   the user agent is not a valid header value.
    /// - [`ScraperError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(
        search_url: &str,
        search_terms: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScraperError> {
        let search_url = Url::parse(search_url).map_err(|e| ScraperError::InvalidSearchUrl {
            url: search_url.to_owned(),
            reason: e.to_string(),
        })?;

        let headers = default_headers(&search_url, user_agent)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            search_url,
            search_terms: search_terms.to_owned(),
            max_retries,
            backoff_base_secs,
            extractors: ExtractorSet::default(),
        })
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// See [`SearchClient::new`].
    pub fn from_config(config: &shelfwatch_core::AppConfig) -> Result<Self, ScraperError> {
        Self::new(
            &config.search_url,
            &config.search_terms,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    /// Fetches the HTML body of results page `page` (1-based).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any non-2xx response.
    /// - [`ScraperError::Http`] for network failures and timeouts.
    pub async fn fetch_results_page(&self, page: u32) -> Result<String, ScraperError> {
        let url = self.page_url(page);

        retry_with_backoff(self.max_retries, self.backoff_base_secs, || {
            let url = url.clone();
            async move {
                let response = self.client.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(ScraperError::UnexpectedStatus {
                        status: status.as_u16(),
                        url,
                    });
                }
                Ok(response.text().await?)
            }
        })
        .await
    }

    /// Builds the URL of results page `page`: the search URL with `k` and
    /// `page` query parameters appended.
    pub(crate) fn page_url(&self, page: u32) -> String {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("k", &self.search_terms)
            .append_pair("page", &page.to_string());
        url.into()
    }
}

/// Header set sent with every request. The client hints and referer match
/// what a desktop browser sends on the storefront.
fn default_headers(search_url: &Url, user_agent: &str) -> Result<HeaderMap, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidSearchUrl {
        url: search_url.to_string(),
        reason,
    };

    let mut headers = HeaderMap::new();
    let referer = format!("{}/", search_url.origin().ascii_serialization());
    headers.insert(
        reqwest::header::REFERER,
        HeaderValue::from_str(&referer).map_err(|e| invalid(e.to_string()))?,
    );
    headers.insert(
        reqwest::header::USER_AGENT,
        HeaderValue::from_str(user_agent).map_err(|e| invalid(format!("user agent: {e}")))?,
    );
    headers.insert(
        reqwest::header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        reqwest::header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua"),
        HeaderValue::from_static("Not_A Brand"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-mobile"),
        HeaderValue::from_static("?0"),
    );
    headers.insert(
        HeaderName::from_static("sec-ch-ua-platform"),
        HeaderValue::from_static("macOS"),
    );
    Ok(headers)
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
