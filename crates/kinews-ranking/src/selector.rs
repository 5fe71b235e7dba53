//! Top-N selection and curator overrides.

use chrono::{DateTime, Utc};
use kinews_core::{Article, ScoringConfig};
use serde::Serialize;

use crate::scorer::relevance_score;

/// An article paired with the score it was selected by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedArticle {
    pub article: Article,
    pub score: u32,
}

/// Score every article and keep the `n` highest.
///
/// The sort is stable, so equal scores keep their input order. Returns fewer
/// than `n` items when the pool is smaller.
#[must_use]
pub fn select_top(
    articles: &[Article],
    n: usize,
    now: DateTime<Utc>,
    config: &ScoringConfig,
) -> Vec<RankedArticle> {
    select_top_by(articles.iter().collect(), n, now, config, |article| *article)
        .into_iter()
        .map(|(article, score)| RankedArticle {
            article: article.clone(),
            score,
        })
        .collect()
}

/// [`select_top`] over items that carry an article, such as stored rows
/// with their ids. Each kept item is returned with its score.
#[must_use]
pub fn select_top_by<T, F>(
    items: Vec<T>,
    n: usize,
    now: DateTime<Utc>,
    config: &ScoringConfig,
    article_of: F,
) -> Vec<(T, u32)>
where
    F: Fn(&T) -> &Article,
{
    let mut ranked: Vec<(T, u32)> = items
        .into_iter()
        .map(|item| {
            let score = relevance_score(article_of(&item), now, config);
            (item, score)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

/// Curator state over a pool of articles.
///
/// Without an override the selection is recomputed from the pool on every
/// call, so newly ingested articles can enter it. An override replaces the
/// automatic selection until cleared. The pool itself is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Curation {
    top_n: usize,
    manual: Option<Vec<Article>>,
}

impl Curation {
    #[must_use]
    pub fn new(top_n: usize) -> Self {
        Self { top_n, manual: None }
    }

    #[must_use]
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.manual.is_some()
    }

    /// The current ordered selection.
    #[must_use]
    pub fn selection(
        &self,
        pool: &[Article],
        now: DateTime<Utc>,
        config: &ScoringConfig,
    ) -> Vec<Article> {
        match &self.manual {
            Some(articles) => articles.clone(),
            None => select_top(pool, self.top_n, now, config)
                .into_iter()
                .map(|ranked| ranked.article)
                .collect(),
        }
    }

    /// Replace the automatic selection with an explicit list (any subset,
    /// order or count).
    pub fn set_override(&mut self, articles: Vec<Article>) {
        self.manual = Some(articles);
    }

    pub fn clear_override(&mut self) {
        self.manual = None;
    }

    /// Swap the item at `index` with its predecessor. Returns `false` when
    /// there is nothing to swap.
    pub fn move_up(
        &mut self,
        index: usize,
        pool: &[Article],
        now: DateTime<Utc>,
        config: &ScoringConfig,
    ) -> bool {
        let selected = self.freeze(pool, now, config);
        if index == 0 || index >= selected.len() {
            return false;
        }
        selected.swap(index - 1, index);
        true
    }

    /// Swap the item at `index` with its successor.
    pub fn move_down(
        &mut self,
        index: usize,
        pool: &[Article],
        now: DateTime<Utc>,
        config: &ScoringConfig,
    ) -> bool {
        let selected = self.freeze(pool, now, config);
        if index + 1 >= selected.len() {
            return false;
        }
        selected.swap(index, index + 1);
        true
    }

    /// Drop the item at `index` from the selection.
    pub fn remove(
        &mut self,
        index: usize,
        pool: &[Article],
        now: DateTime<Utc>,
        config: &ScoringConfig,
    ) -> Option<Article> {
        let selected = self.freeze(pool, now, config);
        (index < selected.len()).then(|| selected.remove(index))
    }

    // Edits on an automatic selection turn it into an override first.
    fn freeze(
        &mut self,
        pool: &[Article],
        now: DateTime<Utc>,
        config: &ScoringConfig,
    ) -> &mut Vec<Article> {
        if self.manual.is_none() {
            self.manual = Some(self.selection(pool, now, config));
        }
        self.manual.get_or_insert_with(Vec::new)
    }
}

impl Default for Curation {
    fn default() -> Self {
        Self::new(10)
    }
}
