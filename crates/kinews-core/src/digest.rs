//! Per-calendar-week article aggregate.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::article::Article;

/// Articles collected for one ISO calendar week plus the newsletter text
/// generated from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyDigest {
    pub week_number: u32,
    pub year: i32,
    /// Monday to Sunday, formatted `dd.mm.yyyy - dd.mm.yyyy`.
    pub date_range: String,
    pub items: Vec<Article>,
    pub generated_content: Option<String>,
}

impl WeeklyDigest {
    /// Empty digest for ISO week `week` of `year`. Returns `None` for weeks
    /// that do not exist in that year.
    #[must_use]
    pub fn new(year: i32, week: u32) -> Option<Self> {
        let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
        let sunday = NaiveDate::from_isoywd_opt(year, week, Weekday::Sun)?;
        Some(Self {
            week_number: week,
            year,
            date_range: format!("{} - {}", monday.format("%d.%m.%Y"), sunday.format("%d.%m.%Y")),
            items: Vec::new(),
            generated_content: None,
        })
    }

    /// Empty digest for the ISO week containing `date`.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        let monday = date - chrono::Days::new(u64::from(date.weekday().num_days_from_monday()));
        let sunday = monday + chrono::Days::new(6);
        Self {
            week_number: iso.week(),
            year: iso.year(),
            date_range: format!("{} - {}", monday.format("%d.%m.%Y"), sunday.format("%d.%m.%Y")),
            items: Vec::new(),
            generated_content: None,
        }
    }

    /// Append articles, skipping any whose identity is already present.
    ///
    /// Returns the number of articles actually added.
    pub fn ingest<I>(&mut self, articles: I) -> usize
    where
        I: IntoIterator<Item = Article>,
    {
        let mut seen: HashSet<String> = self.items.iter().map(Article::identity_key).collect();
        let before = self.items.len();
        for article in articles {
            if seen.insert(article.identity_key()) {
                self.items.push(article);
            }
        }
        self.items.len() - before
    }

    /// Remove the article with the given identity key. Returns `true` if one
    /// was removed.
    pub fn remove_article(&mut self, identity_key: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|a| a.identity_key() != identity_key);
        self.items.len() != before
    }

    /// Store newly generated newsletter text, replacing any previous version.
    pub fn set_generated_content(&mut self, content: String) {
        self.generated_content = Some(content);
    }
}
