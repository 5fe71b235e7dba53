//! Raw feed records as they arrive from a feed parse or a JSON import.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An RSS 2.0 `<item>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RssItem {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    /// `<content:encoded>`
    pub content_encoded: Option<String>,
    /// `<dc:creator>` or `<author>`
    pub creator: Option<String>,
    pub pub_date: Option<String>,
    /// `<dc:date>`
    pub dc_date: Option<String>,
    pub guid: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// An Atom `<entry>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtomEntry {
    pub title: Option<String>,
    /// `href` of the first `alternate` (or untyped) `<link>`.
    pub link: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
    pub published: Option<String>,
    pub updated: Option<String>,
    pub id: Option<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A raw feed record of one of the shapes the normalizer understands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry", rename_all = "lowercase")]
pub enum RawFeedEntry {
    Rss(RssItem),
    Atom(AtomEntry),
    /// Arbitrary JSON object, probed by well-known key names.
    Unknown(Map<String, Value>),
}

/// A raw entry tagged with the label of the feed it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedEntry {
    pub source_name: String,
    pub entry: RawFeedEntry,
}

/// The uniform field set the normalizer works on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFields {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub creator: Option<String>,
    pub link: Option<String>,
    pub guid: Option<String>,
    pub id: Option<String>,
    /// Date candidates in priority order: `pubDate`, `isoDate`, `date`.
    pub pub_date: Option<String>,
    pub iso_date: Option<String>,
    pub date: Option<String>,
    pub categories: Vec<String>,
}

impl RawFeedEntry {
    /// Extract the common field set from whichever shape this entry has.
    #[must_use]
    pub fn fields(&self) -> RawFields {
        match self {
            RawFeedEntry::Rss(item) => RawFields {
                title: item.title.clone(),
                description: item.description.clone(),
                content: item.content_encoded.clone(),
                creator: item.creator.clone(),
                link: item.link.clone(),
                guid: item.guid.clone(),
                id: None,
                pub_date: item.pub_date.clone(),
                iso_date: None,
                date: item.dc_date.clone(),
                categories: item.categories.clone(),
            },
            RawFeedEntry::Atom(entry) => RawFields {
                title: entry.title.clone(),
                description: entry.summary.clone(),
                content: entry.content.clone(),
                creator: entry.author.clone(),
                link: entry.link.clone(),
                guid: None,
                id: entry.id.clone(),
                pub_date: None,
                iso_date: entry.published.clone(),
                date: entry.updated.clone(),
                categories: entry.categories.clone(),
            },
            RawFeedEntry::Unknown(map) => unknown_fields(map),
        }
    }
}

fn unknown_fields(map: &Map<String, Value>) -> RawFields {
    let first = |keys: &[&str]| keys.iter().find_map(|k| map.get(*k).and_then(value_text));

    let categories = match map.get("categories") {
        Some(Value::Array(items)) => items.iter().filter_map(value_text).collect(),
        Some(other) => value_text(other).into_iter().collect(),
        None => Vec::new(),
    };

    RawFields {
        title: first(&["title"]),
        description: first(&["description", "summary", "contentSnippet"]),
        content: first(&["content", "content:encoded", "contentEncoded"]),
        creator: first(&["creator", "dc:creator", "author"]),
        link: first(&["link", "url"]),
        guid: first(&["guid"]),
        id: first(&["id"]),
        pub_date: first(&["pubDate"]),
        iso_date: first(&["isoDate"]),
        date: first(&["date"]),
        categories,
    }
}

/// Best-effort text from a JSON value of unknown shape.
///
/// Objects are probed for the keys XML-to-JSON converters commonly use for
/// text content and link targets.
fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => items.iter().find_map(value_text),
        Value::Object(obj) => ["_", "#text", "$t", "href", "value", "name"]
            .iter()
            .find_map(|k| obj.get(*k).and_then(value_text)),
        Value::Bool(_) | Value::Null => None,
    }
}
