use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::scoring::ScoringConfig;
use crate::ConfigError;

/// One configured RSS/Atom source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    /// Human label, becomes `Article::source_name`.
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub categories: Vec<String>,
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedsFile {
    pub feeds: Vec<FeedSource>,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl FeedsFile {
    /// Sources that collection should visit, in file order.
    pub fn enabled(&self) -> impl Iterator<Item = &FeedSource> {
        self.feeds.iter().filter(|f| f.enabled)
    }

    /// Look up a source by name, case-insensitively.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&FeedSource> {
        let wanted = name.to_lowercase();
        self.feeds.iter().find(|f| f.name.to_lowercase() == wanted)
    }
}

/// Load and validate the feed source list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_feeds(path: &Path) -> Result<FeedsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FeedsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_feeds(&content)
}

/// Parse and validate feeds YAML already in memory.
///
/// # Errors
///
/// Returns `ConfigError` if parsing or validation fails.
pub fn parse_feeds(content: &str) -> Result<FeedsFile, ConfigError> {
    let feeds_file: FeedsFile = serde_yaml::from_str(content).map_err(ConfigError::FeedsFileParse)?;
    validate_feeds(&feeds_file)?;
    Ok(feeds_file)
}

fn validate_feeds(feeds_file: &FeedsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_urls = HashSet::new();

    for feed in &feeds_file.feeds {
        if feed.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "feed name must be non-empty".to_string(),
            ));
        }

        if !(feed.url.starts_with("http://") || feed.url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "feed '{}' has invalid url '{}'; must start with http:// or https://",
                feed.name, feed.url
            )));
        }

        if !seen_names.insert(feed.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed name: '{}'",
                feed.name
            )));
        }

        if !seen_urls.insert(feed.url.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate feed url: '{}' (from feed '{}')",
                feed.url, feed.name
            )));
        }
    }

    if feeds_file.scoring.min_score < 1 {
        return Err(ConfigError::Validation(
            "scoring.min_score must be at least 1".to_string(),
        ));
    }

    let mut last_days = i64::MIN;
    for band in &feeds_file.scoring.recency_bands {
        if band.max_days <= last_days {
            return Err(ConfigError::Validation(
                "scoring.recency_bands must be sorted by ascending max_days".to_string(),
            ));
        }
        last_days = band.max_days;
    }

    Ok(())
}

#[cfg(test)]
#[path = "feeds_test.rs"]
mod tests;
