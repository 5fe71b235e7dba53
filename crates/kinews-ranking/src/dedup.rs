//! First-seen-wins deduplication over article identity.

use std::collections::HashSet;

use kinews_core::Article;

/// Remove later articles whose identity (lowercased, whitespace-collapsed
/// title plus link) was already seen. Relative order of survivors is kept
/// and no fields are merged.
#[must_use]
pub fn deduplicate(articles: Vec<Article>) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::with_capacity(articles.len());
    let before = articles.len();
    let kept: Vec<Article> = articles
        .into_iter()
        .filter(|article| seen.insert(article.identity_key()))
        .collect();

    if kept.len() != before {
        tracing::debug!(
            dropped = before - kept.len(),
            kept = kept.len(),
            "removed duplicate articles"
        );
    }
    kept
}
