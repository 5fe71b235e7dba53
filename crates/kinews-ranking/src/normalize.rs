//! Feed item normalization: raw record in, clean [`Article`] (or nothing) out.
//!
//! Cleaning is deliberately shallow. Tags are removed by pattern, not by an
//! HTML parser, and only a fixed set of entities is decoded; anything else
//! passes through verbatim.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use kinews_core::{Article, MANUAL_SOURCE_NAME};
use regex::Regex;

use crate::raw::{RawFeedEntry, RawFields};

/// Characters of the description used when an item has no title.
const TITLE_FALLBACK_CHARS: usize = 100;

static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Decoded in this order; `&amp;` precedes `&#39;`, so `&amp;#39;` ends up as `'`.
const ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&#39;", "'"),
    ("&nbsp;", " "),
];

/// A curator-submitted article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomSubmission {
    pub title: String,
    pub link: String,
    pub description: Option<String>,
    pub content: Option<String>,
}

/// Normalize one raw feed entry.
///
/// Returns `None` when the entry has neither title nor description, or when
/// no title or link survives cleaning. Unparseable dates become `now`.
#[must_use]
pub fn normalize_entry(
    entry: &RawFeedEntry,
    source_name: &str,
    now: DateTime<Utc>,
) -> Option<Article> {
    normalize_fields(entry.fields(), source_name, now)
}

/// Normalize a manual import. The result is tagged with the manual source
/// label and dated `now`.
#[must_use]
pub fn normalize_custom(submission: &CustomSubmission, now: DateTime<Utc>) -> Option<Article> {
    let fields = RawFields {
        title: Some(submission.title.clone()),
        description: submission.description.clone(),
        content: submission.content.clone(),
        link: Some(submission.link.clone()),
        ..RawFields::default()
    };
    normalize_fields(fields, MANUAL_SOURCE_NAME, now)
}

fn normalize_fields(fields: RawFields, source_name: &str, now: DateTime<Utc>) -> Option<Article> {
    let has_title = fields.title.as_deref().is_some_and(|t| !t.trim().is_empty());
    let has_description = fields
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if !has_title && !has_description {
        tracing::debug!(source = source_name, "dropping entry without title or description");
        return None;
    }

    let description = fields.description.as_deref().map(clean_text).unwrap_or_default();
    let title = match fields.title.as_deref().map(clean_text) {
        Some(t) if !t.is_empty() => t,
        _ => description
            .chars()
            .take(TITLE_FALLBACK_CHARS)
            .collect::<String>()
            .trim()
            .to_string(),
    };
    if title.is_empty() {
        tracing::debug!(source = source_name, "dropping entry whose title cleaned to nothing");
        return None;
    }

    let link = fields
        .link
        .as_deref()
        .map(collapse_whitespace)
        .unwrap_or_default();
    if link.is_empty() {
        tracing::debug!(source = source_name, title = %title, "dropping entry without link");
        return None;
    }

    let guid = resolve_guid(fields.guid.as_deref(), fields.id.as_deref(), &link);

    let pub_date = [&fields.pub_date, &fields.iso_date, &fields.date]
        .into_iter()
        .filter_map(|d| d.as_deref())
        .find_map(parse_date)
        .unwrap_or(now);

    let content = fields
        .content
        .as_deref()
        .map(clean_text)
        .filter(|c| !c.is_empty());
    let author = fields
        .creator
        .as_deref()
        .map(clean_text)
        .filter(|c| !c.is_empty());
    let categories = fields
        .categories
        .iter()
        .map(|c| clean_text(c))
        .filter(|c| !c.is_empty())
        .collect();

    Some(Article {
        title,
        description,
        content,
        link,
        guid,
        pub_date,
        source_name: source_name.to_string(),
        author,
        categories,
    })
}

/// Strip tags, decode the known entities, collapse whitespace.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    collapse_whitespace(&decode_entities(&strip_tags(raw)))
}

/// Remove anything shaped like `<...>`.
#[must_use]
pub fn strip_tags(raw: &str) -> String {
    TAG_PATTERN.replace_all(raw, "").into_owned()
}

/// Decode the fixed entity whitelist; all other entities are left as-is.
#[must_use]
pub fn decode_entities(raw: &str) -> String {
    ENTITIES
        .iter()
        .fold(raw.to_string(), |text, (entity, literal)| text.replace(entity, literal))
}

/// Collapse runs of whitespace to one space and trim.
#[must_use]
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse the date formats seen in feeds: RFC 2822, RFC 3339 and a few
/// zone-less forms (read as UTC).
#[must_use]
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    for fmt in ["%Y-%m-%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
        }
    }
    None
}

/// Feed guid, then id, then link, then the empty string.
#[must_use]
pub fn resolve_guid(guid: Option<&str>, id: Option<&str>, link: &str) -> String {
    [guid, id, Some(link)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
