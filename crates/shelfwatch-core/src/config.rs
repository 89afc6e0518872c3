use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36";

/// Postgres truncates identifiers longer than this many bytes.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("SHELFWATCH_ENV", "development"))?;

    let bind_addr = or_default("SHELFWATCH_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("SHELFWATCH_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("SHELFWATCH_LOG_LEVEL", "info");

    let table_name = or_default("SHELFWATCH_TABLE_NAME", "books");
    validate_table_name(&table_name).map_err(|reason| invalid("SHELFWATCH_TABLE_NAME", reason))?;
    let db_connect_timeout_secs = parse_u64("SHELFWATCH_DB_CONNECT_TIMEOUT_SECS", "10")?;

    let search_url = or_default("SHELFWATCH_SEARCH_URL", "https://www.amazon.com/s");
    if !(search_url.starts_with("http://") || search_url.starts_with("https://")) {
        return Err(invalid(
            "SHELFWATCH_SEARCH_URL",
            format!("\"{search_url}\" is not an http(s) URL"),
        ));
    }
    let search_terms = or_default("SHELFWATCH_SEARCH_TERMS", "data engineering books");

    let max_pages = parse_u32("SHELFWATCH_MAX_PAGES", "3")?;
    if max_pages == 0 {
        return Err(invalid("SHELFWATCH_MAX_PAGES", "must be at least 1".into()));
    }
    let target_items = parse_usize("SHELFWATCH_TARGET_ITEMS", "100")?;
    let request_timeout_secs = parse_u64("SHELFWATCH_REQUEST_TIMEOUT_SECS", "10")?;
    let user_agent = or_default("SHELFWATCH_USER_AGENT", DEFAULT_USER_AGENT);

    let page_delay_min_secs = parse_u64("SHELFWATCH_PAGE_DELAY_MIN_SECS", "1")?;
    let page_delay_max_secs = parse_u64("SHELFWATCH_PAGE_DELAY_MAX_SECS", "3")?;
    if page_delay_min_secs > page_delay_max_secs {
        return Err(invalid(
            "SHELFWATCH_PAGE_DELAY_MIN_SECS",
            format!(
                "min ({page_delay_min_secs}) must not exceed SHELFWATCH_PAGE_DELAY_MAX_SECS ({page_delay_max_secs})"
            ),
        ));
    }

    let max_retries = parse_u32("SHELFWATCH_MAX_RETRIES", "0")?;
    let retry_backoff_base_secs = parse_u64("SHELFWATCH_RETRY_BACKOFF_BASE_SECS", "5")?;

    let ingest_interval_secs = parse_u64("SHELFWATCH_INGEST_INTERVAL_SECS", "600")?;
    let refresh_interval_secs = parse_u64("SHELFWATCH_REFRESH_INTERVAL_SECS", "900")?;
    if ingest_interval_secs == 0 {
        return Err(invalid(
            "SHELFWATCH_INGEST_INTERVAL_SECS",
            "must be at least 1".into(),
        ));
    }
    if refresh_interval_secs == 0 {
        return Err(invalid(
            "SHELFWATCH_REFRESH_INTERVAL_SECS",
            "must be at least 1".into(),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        table_name,
        db_connect_timeout_secs,
        search_url,
        search_terms,
        max_pages,
        target_items,
        request_timeout_secs,
        user_agent,
        page_delay_min_secs,
        page_delay_max_secs,
        max_retries,
        retry_backoff_base_secs,
        ingest_interval_secs,
        refresh_interval_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SHELFWATCH_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Checks that `name` is safe to splice into DDL as an unquoted identifier.
///
/// # Errors
///
/// Returns a human-readable reason when the name is empty, too long, or
/// contains anything other than ASCII letters, digits, and underscores (or
/// starts with a digit).
pub fn validate_table_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err("table name is empty".to_string());
    };
    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(format!("table name exceeds {MAX_IDENTIFIER_LEN} bytes"));
    }
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(format!("\"{name}\" must start with a letter or underscore"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(format!(
            "\"{name}\" may only contain ASCII letters, digits, and underscores"
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
