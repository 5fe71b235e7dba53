//! RSS 2.0 / RDF / Atom parsing into [`RawFeedEntry`] records.
//!
//! The parser only extracts fields; it does not clean them. Markup inside
//! descriptions is left for the normalizer, and dates stay as raw strings.

use std::borrow::Cow;

use kinews_ranking::{AtomEntry, RawFeedEntry, RssItem};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::error::FeedError;

/// An entry being assembled between its start and end tags.
enum Pending {
    Rss(RssItem),
    Atom(AtomEntry),
}

impl Pending {
    fn into_entry(self) -> RawFeedEntry {
        match self {
            Pending::Rss(item) => RawFeedEntry::Rss(item),
            Pending::Atom(entry) => RawFeedEntry::Atom(entry),
        }
    }

    /// Attribute-carried fields on a direct child element.
    fn apply_attributes(&mut self, name: &str, element: &BytesStart<'_>) {
        let Pending::Atom(entry) = self else {
            return;
        };
        match name {
            "link" if entry.link.is_none() => {
                let rel = attribute(element, "rel");
                if matches!(rel.as_deref(), None | Some("alternate")) {
                    entry.link = attribute(element, "href");
                }
            }
            "category" => {
                if let Some(term) = attribute(element, "term") {
                    entry.categories.push(term);
                }
            }
            _ => {}
        }
    }

    /// Whether text at `path` (element names below the entry) belongs to a field.
    fn captures(&self, path: &[String]) -> bool {
        match (self, path.first().map(String::as_str)) {
            (_, None) => false,
            (Pending::Atom(_), Some("author")) => path.last().is_some_and(|n| n == "name"),
            _ => true,
        }
    }

    fn assign(&mut self, name: &str, text: String) {
        if text.is_empty() {
            return;
        }
        match self {
            Pending::Rss(item) => match name {
                "title" => item.title = Some(text),
                "link" => item.link = Some(text),
                "description" => item.description = Some(text),
                "content:encoded" => item.content_encoded = Some(text),
                "dc:creator" => item.creator = Some(text),
                "author" if item.creator.is_none() => item.creator = Some(text),
                "pubDate" => item.pub_date = Some(text),
                "dc:date" => item.dc_date = Some(text),
                "guid" => item.guid = Some(text),
                "category" => item.categories.push(text),
                _ => {}
            },
            Pending::Atom(entry) => match name {
                "title" => entry.title = Some(text),
                "summary" => entry.summary = Some(text),
                "content" => entry.content = Some(text),
                "author" => entry.author = Some(text),
                "published" => entry.published = Some(text),
                "updated" => entry.updated = Some(text),
                "id" => entry.id = Some(text),
                "link" if entry.link.is_none() => entry.link = Some(text),
                _ => {}
            },
        }
    }
}

/// Parse a feed document into raw entries, in document order.
///
/// `<item>` elements (RSS 2.0 and RDF) become [`RawFeedEntry::Rss`],
/// `<entry>` elements become [`RawFeedEntry::Atom`]. Everything outside an
/// entry, such as channel metadata, is ignored.
///
/// # Errors
///
/// Returns [`FeedError::Xml`] if the document is malformed.
pub fn parse_feed(xml: &str) -> Result<Vec<RawFeedEntry>, FeedError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<Pending> = None;
    // Element names opened inside the current entry.
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = tag_name(&e);
                match current.as_mut() {
                    None => {
                        current = match name.as_str() {
                            "item" => Some(Pending::Rss(RssItem::default())),
                            "entry" => Some(Pending::Atom(AtomEntry::default())),
                            _ => None,
                        };
                        path.clear();
                    }
                    Some(pending) => {
                        if path.is_empty() {
                            text.clear();
                            pending.apply_attributes(&name, &e);
                        }
                        path.push(name);
                    }
                }
            }
            Event::Empty(e) => {
                if let Some(pending) = current.as_mut() {
                    if path.is_empty() {
                        pending.apply_attributes(&tag_name(&e), &e);
                    }
                }
            }
            Event::End(_) => {
                if current.is_none() {
                    continue;
                }
                match path.pop() {
                    None => entries.extend(current.take().map(Pending::into_entry)),
                    Some(name) if path.is_empty() => {
                        if let Some(pending) = current.as_mut() {
                            pending.assign(&name, std::mem::take(&mut text));
                        }
                    }
                    Some(_) => {}
                }
            }
            Event::Text(e) => {
                if current.as_ref().is_some_and(|p| p.captures(&path)) {
                    push_text(&mut text, &unescape_text(&e));
                }
            }
            Event::CData(e) => {
                if current.as_ref().is_some_and(|p| p.captures(&path)) {
                    push_text(&mut text, &String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}

fn tag_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

fn attribute(element: &BytesStart<'_>, key: &str) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key.as_bytes())
        .and_then(|a| a.unescape_value().ok().map(Cow::into_owned))
}

/// XML-unescape a text node. Entities XML does not define (`&nbsp;` and
/// friends) are kept literally for the normalizer; the predefined ones and
/// character references around them are still decoded.
fn unescape_text(e: &BytesText<'_>) -> String {
    let raw = String::from_utf8_lossy(e.as_ref());
    quick_xml::escape::unescape(&escape_unknown_entities(&raw))
        .map_or_else(|_| raw.to_string(), Cow::into_owned)
}

const XML_ENTITIES: &[&str] = &["lt", "gt", "amp", "apos", "quot"];

/// Turn every `&` that does not start a predefined entity or character
/// reference into `&amp;`, so unescaping yields it verbatim.
fn escape_unknown_entities(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        let known = tail.find(';').is_some_and(|end| {
            let name = &tail[..end];
            XML_ENTITIES.contains(&name) || is_char_ref(name)
        });
        out.push_str(if known { "&" } else { "&amp;" });
        rest = tail;
    }
    out.push_str(rest);
    out
}

fn is_char_ref(name: &str) -> bool {
    if let Some(hex) = name.strip_prefix("#x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    name.strip_prefix('#')
        .is_some_and(|dec| !dec.is_empty() && dec.chars().all(|c| c.is_ascii_digit()))
}

// Text nodes split by nested markup are joined with a space.
fn push_text(buf: &mut String, piece: &str) {
    if !buf.is_empty() && !buf.ends_with(char::is_whitespace) {
        buf.push(' ');
    }
    buf.push_str(piece);
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
