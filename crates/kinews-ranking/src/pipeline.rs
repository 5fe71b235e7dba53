//! Ranking pipeline orchestration.

use chrono::{DateTime, Utc};
use kinews_core::{Article, ScoringConfig};

use crate::dedup::deduplicate;
use crate::normalize::normalize_entry;
use crate::raw::SourcedEntry;
use crate::selector::{select_top, RankedArticle};

/// Normalize a batch of raw entries and drop duplicates.
///
/// Entries that fail normalization are excluded individually; the batch never
/// fails as a whole. Output order follows input order.
#[must_use]
pub fn normalize_batch(entries: &[SourcedEntry], now: DateTime<Utc>) -> Vec<Article> {
    let normalized: Vec<Article> = entries
        .iter()
        .filter_map(|e| normalize_entry(&e.entry, &e.source_name, now))
        .collect();

    let rejected = entries.len() - normalized.len();
    if rejected > 0 {
        tracing::debug!(rejected, total = entries.len(), "entries failed normalization");
    }

    deduplicate(normalized)
}

/// Deduplicate, score and keep the `n` most relevant articles.
///
/// Empty pools produce an empty selection.
#[must_use]
pub fn rank(
    articles: Vec<Article>,
    n: usize,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> Vec<RankedArticle> {
    let pool = deduplicate(articles);
    if pool.is_empty() {
        tracing::info!("no articles to rank");
        return Vec::new();
    }

    let selected = select_top(&pool, n, now, config);
    tracing::info!(pool = pool.len(), selected = selected.len(), "ranked articles");
    selected
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::raw::{AtomEntry, RawFeedEntry, RssItem};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 15, 12, 0, 0).unwrap()
    }

    fn rss(source: &str, title: &str, link: &str, pub_date: &str) -> SourcedEntry {
        SourcedEntry {
            source_name: source.to_string(),
            entry: RawFeedEntry::Rss(RssItem {
                title: Some(title.to_string()),
                link: Some(link.to_string()),
                pub_date: Some(pub_date.to_string()),
                ..RssItem::default()
            }),
        }
    }

    #[test]
    fn normalize_batch_drops_invalid_and_duplicate_entries() {
        let entries = vec![
            rss(
                "heise online",
                "KI im Alltag",
                "https://h.test/1",
                "Wed, 15 Oct 2025 08:00:00 GMT",
            ),
            rss("heise online", "", "https://h.test/2", "Wed, 15 Oct 2025 08:00:00 GMT"),
            rss("t3n", "ki  im alltag", "https://h.test/1", "Tue, 14 Oct 2025 08:00:00 GMT"),
            SourcedEntry {
                source_name: "The Verge".to_string(),
                entry: RawFeedEntry::Atom(AtomEntry {
                    title: Some("Nvidia ships new GPUs".to_string()),
                    link: Some("https://v.test/gpu".to_string()),
                    published: Some("2025-10-14T10:00:00Z".to_string()),
                    ..AtomEntry::default()
                }),
            },
        ];

        let articles = normalize_batch(&entries, now());
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["KI im Alltag", "Nvidia ships new GPUs"]);
        assert_eq!(articles[0].source_name, "heise online");
    }

    #[test]
    fn rank_orders_by_score() {
        let entries = vec![
            rss("Lokalblatt", "Wetter", "https://l.test/1", "Mon, 01 Sep 2025 08:00:00 GMT"),
            rss("Wired", "OpenAI und ChatGPT", "https://w.test/1", "Wed, 15 Oct 2025 08:00:00 GMT"),
            rss("Lokalblatt", "Neues Startup", "https://l.test/2", "Sun, 12 Oct 2025 08:00:00 GMT"),
        ];
        let ranked = rank(normalize_batch(&entries, now()), 2, now(), &ScoringConfig::default());
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].article.source_name, "Wired");
        assert_eq!(ranked[1].article.title, "Neues Startup");
        assert!(ranked[0].score > ranked[1].score);
    }

    #[test]
    fn rank_of_empty_pool_is_empty() {
        assert!(rank(vec![], 10, now(), &ScoringConfig::default()).is_empty());
    }
}
