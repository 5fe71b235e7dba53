//! Database operations for the `articles` table.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use kinews_core::Article;
use sha2::{Digest, Sha256};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `articles` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ArticleRow {
    pub id: i64,
    /// SHA-256 of the article identity at ingestion time. Not updated on
    /// rename, so re-fetching the same feed item stays a no-op.
    pub fingerprint: String,
    pub title: String,
    pub description: String,
    pub content: Option<String>,
    pub link: String,
    pub guid: String,
    pub pub_date: DateTime<Utc>,
    pub source_name: String,
    pub author: Option<String>,
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ArticleRow {
    #[must_use]
    pub fn into_article(self) -> Article {
        Article {
            title: self.title,
            description: self.description,
            content: self.content,
            link: self.link,
            guid: self.guid,
            pub_date: self.pub_date,
            source_name: self.source_name,
            author: self.author,
            categories: self.categories,
        }
    }
}

const ARTICLE_COLUMNS: &str = "id, fingerprint, title, description, content, link, guid, \
     pub_date, source_name, author, categories, created_at, updated_at";

/// Hex SHA-256 of [`Article::identity_key`].
#[must_use]
pub fn article_fingerprint(article: &Article) -> String {
    format!("{:x}", Sha256::digest(article.identity_key().as_bytes()))
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert an article unless one with the same identity exists.
///
/// Returns the new row id, or `None` when the article was already stored.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_article(pool: &PgPool, article: &Article) -> Result<Option<i64>, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO articles \
             (fingerprint, title, description, content, link, guid, pub_date, \
              source_name, author, categories) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         ON CONFLICT (fingerprint) DO NOTHING \
         RETURNING id",
    )
    .bind(article_fingerprint(article))
    .bind(&article.title)
    .bind(&article.description)
    .bind(article.content.as_deref())
    .bind(&article.link)
    .bind(&article.guid)
    .bind(article.pub_date)
    .bind(&article.source_name)
    .bind(article.author.as_deref())
    .bind(&article.categories)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// Fetch one article by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_article(pool: &PgPool, id: i64) -> Result<Option<ArticleRow>, DbError> {
    let row = sqlx::query_as::<_, ArticleRow>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Articles published in ISO week `week` of `year` (Monday 00:00 UTC up to
/// the following Monday), in ingestion order.
///
/// # Errors
///
/// Returns [`DbError::InvalidWeek`] for a week that does not exist, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn list_articles_for_week(
    pool: &PgPool,
    year: i32,
    week: u32,
) -> Result<Vec<ArticleRow>, DbError> {
    let (start, end) = week_range(year, week).ok_or(DbError::InvalidWeek { year, week })?;

    let rows = sqlx::query_as::<_, ArticleRow>(&format!(
        "SELECT {ARTICLE_COLUMNS} FROM articles \
         WHERE pub_date >= $1 AND pub_date < $2 \
         ORDER BY created_at ASC, id ASC"
    ))
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Delete an article by id.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the delete fails.
pub async fn delete_article(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Replace an article's title.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no row has that id, or [`DbError::Sqlx`]
/// if the update fails.
pub async fn update_article_title(pool: &PgPool, id: i64, title: &str) -> Result<(), DbError> {
    let result = sqlx::query("UPDATE articles SET title = $1, updated_at = NOW() WHERE id = $2")
        .bind(title)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

/// Half-open UTC range covering ISO week `week` of `year`.
pub(crate) fn week_range(year: i32, week: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let monday = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)?;
    let next_monday = monday.checked_add_days(chrono::Days::new(7))?;
    Some((
        monday.and_hms_opt(0, 0, 0)?.and_utc(),
        next_monday.and_hms_opt(0, 0, 0)?.and_utc(),
    ))
}
