//! Database operations for the `newsletters` archive table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `newsletters` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NewsletterRow {
    pub id: i64,
    pub public_id: Uuid,
    pub year: i32,
    pub week: i32,
    pub date_range: String,
    pub title: String,
    pub content: String,
    /// `generated` or `fallback`.
    pub origin: String,
    /// JSON array of the article links the newsletter was built from.
    pub article_links: Value,
    pub created_at: DateTime<Utc>,
}

impl NewsletterRow {
    /// The stored article links; non-string entries are skipped.
    #[must_use]
    pub fn links(&self) -> Vec<String> {
        match &self.article_links {
            Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Input for [`save_newsletter`].
#[derive(Debug, Clone)]
pub struct NewNewsletter<'a> {
    pub year: i32,
    pub week: i32,
    pub date_range: &'a str,
    pub title: &'a str,
    pub content: &'a str,
    pub origin: &'a str,
    pub article_links: &'a [String],
}

/// Archive filter. `text` matches title or content, case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterQuery {
    pub year: Option<i32>,
    pub week: Option<i32>,
    pub text: Option<String>,
    pub limit: i64,
}

impl Default for NewsletterQuery {
    fn default() -> Self {
        Self {
            year: None,
            week: None,
            text: None,
            limit: 20,
        }
    }
}

const NEWSLETTER_COLUMNS: &str =
    "id, public_id, year, week, date_range, title, content, origin, article_links, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Append a newsletter to the archive.
///
/// Generates a UUID in Rust and binds it to `public_id`. Saving the same week
/// twice stores two rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn save_newsletter(
    pool: &PgPool,
    newsletter: &NewNewsletter<'_>,
) -> Result<NewsletterRow, DbError> {
    let public_id = Uuid::new_v4();
    let links = Value::from(newsletter.article_links.to_vec());

    let row = sqlx::query_as::<_, NewsletterRow>(&format!(
        "INSERT INTO newsletters \
             (public_id, year, week, date_range, title, content, origin, article_links) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING {NEWSLETTER_COLUMNS}"
    ))
    .bind(public_id)
    .bind(newsletter.year)
    .bind(newsletter.week)
    .bind(newsletter.date_range)
    .bind(newsletter.title)
    .bind(newsletter.content)
    .bind(newsletter.origin)
    .bind(links)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Search the archive, newest first (year, week, creation time, id).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn query_newsletters(
    pool: &PgPool,
    query: &NewsletterQuery,
) -> Result<Vec<NewsletterRow>, DbError> {
    let pattern = query
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(like_pattern);

    let rows = sqlx::query_as::<_, NewsletterRow>(&format!(
        "SELECT {NEWSLETTER_COLUMNS} FROM newsletters \
         WHERE ($1::INTEGER IS NULL OR year = $1) \
           AND ($2::INTEGER IS NULL OR week = $2) \
           AND ($3::TEXT IS NULL OR title ILIKE $3 OR content ILIKE $3) \
         ORDER BY year DESC, week DESC, created_at DESC, id DESC \
         LIMIT $4"
    ))
    .bind(query.year)
    .bind(query.week)
    .bind(pattern)
    .bind(query.limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch one archived newsletter by its public id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_newsletter(
    pool: &PgPool,
    public_id: Uuid,
) -> Result<Option<NewsletterRow>, DbError> {
    let row = sqlx::query_as::<_, NewsletterRow>(&format!(
        "SELECT {NEWSLETTER_COLUMNS} FROM newsletters WHERE public_id = $1"
    ))
    .bind(public_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// `%text%` with LIKE metacharacters escaped (default escape char `\`).
pub(crate) fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    escaped.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
