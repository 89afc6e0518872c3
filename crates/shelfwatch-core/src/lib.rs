mod app_config;
mod config;
pub mod listings;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env, validate_table_name};
pub use listings::{
    BookListing, DEFAULT_AUTHOR, DEFAULT_FORMAT, DEFAULT_PRICE, DEFAULT_RATING,
    DEFAULT_REVIEWS_COUNT,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
