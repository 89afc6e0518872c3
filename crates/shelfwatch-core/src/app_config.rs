use std::net::SocketAddr;
use std::ops::RangeInclusive;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Everything both pipelines need, resolved once at startup and passed down
/// explicitly.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Target table; validated as a plain SQL identifier.
    pub table_name: String,
    pub db_connect_timeout_secs: u64,
    /// Search endpoint without query string, e.g. `https://www.amazon.com/s`.
    pub search_url: String,
    pub search_terms: String,
    pub max_pages: u32,
    /// Stop collecting once this many distinct listings are held.
    pub target_items: usize,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub page_delay_min_secs: u64,
    pub page_delay_max_secs: u64,
    /// Additional attempts per page after a transient failure. `0` disables retries.
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub ingest_interval_secs: u64,
    pub refresh_interval_secs: u64,
}

impl AppConfig {
    #[must_use]
    pub fn db_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout_secs)
    }

    #[must_use]
    pub fn ingest_interval(&self) -> Duration {
        Duration::from_secs(self.ingest_interval_secs)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Inclusive range of whole seconds to pause between result pages.
    #[must_use]
    pub fn page_delay_secs(&self) -> RangeInclusive<u64> {
        self.page_delay_min_secs..=self.page_delay_max_secs
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("table_name", &self.table_name)
            .field("db_connect_timeout_secs", &self.db_connect_timeout_secs)
            .field("search_url", &self.search_url)
            .field("search_terms", &self.search_terms)
            .field("max_pages", &self.max_pages)
            .field("target_items", &self.target_items)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("page_delay_min_secs", &self.page_delay_min_secs)
            .field("page_delay_max_secs", &self.page_delay_max_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("ingest_interval_secs", &self.ingest_interval_secs)
            .field("refresh_interval_secs", &self.refresh_interval_secs)
            .finish()
    }
}
