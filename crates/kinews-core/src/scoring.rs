//! Relevance-scoring weights.
//!
//! The defaults reproduce the hand-tuned heuristic exactly. They are data,
//! not code, so the feeds file may override any of them.

use serde::{Deserialize, Serialize};

use crate::article::MANUAL_SOURCE_NAME;

/// One recency bonus band. Bands are checked in ascending `max_days` order
/// and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecencyBand {
    pub max_days: i64,
    pub bonus: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Matched case-insensitively as substrings.
    pub keywords: Vec<String>,
    pub title_keyword_weight: u32,
    pub description_keyword_weight: u32,
    pub recency_bands: Vec<RecencyBand>,
    /// Compared for exact equality with `source_name`.
    pub custom_source_marker: String,
    pub custom_source_bonus: u32,
    /// Matched case-insensitively as substrings of `source_name`.
    pub reliable_sources: Vec<String>,
    pub reliable_source_bonus: u32,
    pub min_score: u32,
}

const DEFAULT_KEYWORDS: &[&str] = &[
    "KI",
    "AI",
    "künstliche intelligenz",
    "machine learning",
    "deep learning",
    "chatgpt",
    "openai",
    "google",
    "microsoft",
    "meta",
    "tesla",
    "nvidia",
    "startup",
    "tech",
    "innovation",
    "digitalisierung",
    "automation",
    "robotik",
    "algorithmus",
    "daten",
    "software",
    "hardware",
];

const DEFAULT_RELIABLE_SOURCES: &[&str] = &["techcrunch", "wired", "ars technica", "the verge"];

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            keywords: DEFAULT_KEYWORDS.iter().map(|k| (*k).to_string()).collect(),
            title_keyword_weight: 3,
            description_keyword_weight: 1,
            recency_bands: vec![
                RecencyBand { max_days: 1, bonus: 5 },
                RecencyBand { max_days: 3, bonus: 3 },
                RecencyBand { max_days: 7, bonus: 1 },
            ],
            custom_source_marker: MANUAL_SOURCE_NAME.to_string(),
            custom_source_bonus: 2,
            reliable_sources: DEFAULT_RELIABLE_SOURCES
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            reliable_source_bonus: 2,
            min_score: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_weights() {
        let cfg = ScoringConfig::default();
        assert_eq!(cfg.keywords.len(), 22);
        assert_eq!(cfg.title_keyword_weight, 3);
        assert_eq!(cfg.description_keyword_weight, 1);
        assert_eq!(
            cfg.recency_bands
                .iter()
                .map(|b| (b.max_days, b.bonus))
                .collect::<Vec<_>>(),
            vec![(1, 5), (3, 3), (7, 1)]
        );
        assert_eq!(cfg.custom_source_marker, "Eigener");
        assert_eq!(cfg.min_score, 1);
    }

    #[test]
    fn partial_yaml_keeps_remaining_defaults() {
        let cfg: ScoringConfig = serde_yaml::from_str("title_keyword_weight: 4\n").unwrap();
        assert_eq!(cfg.title_keyword_weight, 4);
        assert_eq!(cfg.description_keyword_weight, 1);
        assert_eq!(cfg.reliable_sources.len(), 4);
    }
}
