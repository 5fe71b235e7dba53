//! The canonical article record shared by every pipeline stage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Source label assigned to articles imported by hand.
pub const MANUAL_SOURCE_NAME: &str = "Eigener";

/// Source labels that mark an article as manually imported.
pub const CUSTOM_SOURCE_MARKERS: &[&str] = &[MANUAL_SOURCE_NAME, "Custom"];

/// A normalized feed item or manual import.
///
/// `title` and `link` are never empty once an `Article` exists; the
/// normalizer drops anything that would violate this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub link: String,
    /// Feed-provided id, falling back to `link`.
    pub guid: String,
    pub pub_date: DateTime<Utc>,
    pub source_name: String,
    pub author: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl Article {
    /// True when the article was imported by a curator rather than fetched.
    #[must_use]
    pub fn is_custom(&self) -> bool {
        CUSTOM_SOURCE_MARKERS.contains(&self.source_name.as_str())
    }

    /// Deduplication identity: lowercased, whitespace-collapsed title
    /// concatenated with the link exactly as stored.
    #[must_use]
    pub fn identity_key(&self) -> String {
        let title = self
            .title
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        format!("{title}{}", self.link)
    }

    /// Replace the headline in place. Blank replacements are refused and
    /// leave the article untouched.
    ///
    /// Returns `true` when the title changed.
    pub fn replace_title(&mut self, title: &str) -> bool {
        let cleaned = title.split_whitespace().collect::<Vec<_>>().join(" ");
        if cleaned.is_empty() || cleaned == self.title {
            return false;
        }
        self.title = cleaned;
        true
    }
}
