//! Keyword, recency and source-trust relevance heuristic.

use chrono::{DateTime, Utc};
use kinews_core::{Article, ScoringConfig};

/// Score an article for newsletter relevance.
///
/// Each configured keyword found (case-insensitive substring) in the title
/// adds `title_keyword_weight`, and in the description adds
/// `description_keyword_weight`. The first recency band whose `max_days`
/// covers the article's age in whole days adds its bonus. Custom imports and
/// reliable sources add their bonuses. The result is never below
/// `min_score` nor below 1, and saturates at `u32::MAX`.
///
/// Depends on `now`; re-scoring later may lower the recency term.
#[must_use]
pub fn relevance_score(article: &Article, now: DateTime<Utc>, config: &ScoringConfig) -> u32 {
    let title = article.title.to_lowercase();
    let description = article.description.to_lowercase();

    let mut score = 0_u32;
    for keyword in &config.keywords {
        let keyword = keyword.to_lowercase();
        if title.contains(&keyword) {
            score = score.saturating_add(config.title_keyword_weight);
        }
        if description.contains(&keyword) {
            score = score.saturating_add(config.description_keyword_weight);
        }
    }

    score = score.saturating_add(recency_bonus(article.pub_date, now, config));

    if article.source_name == config.custom_source_marker {
        score = score.saturating_add(config.custom_source_bonus);
    }

    let source = article.source_name.to_lowercase();
    if config
        .reliable_sources
        .iter()
        .any(|s| source.contains(&s.to_lowercase()))
    {
        score = score.saturating_add(config.reliable_source_bonus);
    }

    score.max(config.min_score.max(1))
}

/// Bonus of the first band covering the article's age. Future-dated
/// articles have a negative age and land in the first band.
fn recency_bonus(pub_date: DateTime<Utc>, now: DateTime<Utc>, config: &ScoringConfig) -> u32 {
    let age_days = (now - pub_date).num_days();
    config
        .recency_bands
        .iter()
        .find(|band| age_days <= band.max_days)
        .map_or(0, |band| band.bonus)
}
