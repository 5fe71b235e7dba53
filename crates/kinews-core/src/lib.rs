//! Shared domain types and configuration for the kinews workspace.

pub mod app_config;
pub mod article;
pub mod config;
pub mod digest;
pub mod feeds;
pub mod scoring;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use article::{Article, CUSTOM_SOURCE_MARKERS, MANUAL_SOURCE_NAME};
pub use config::{load_app_config, load_app_config_from_env};
pub use digest::WeeklyDigest;
pub use feeds::{load_feeds, parse_feeds, FeedSource, FeedsFile};
pub use scoring::{RecencyBand, ScoringConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read feeds file {path}: {source}")]
    FeedsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse feeds file: {0}")]
    FeedsFileParse(#[from] serde_yaml::Error),

    #[error("feeds validation failed: {0}")]
    Validation(String),
}
