//! Newsletter rendering: prompt construction, generation, fallback template.

use std::fmt::Write as _;

use kinews_core::{Article, WeeklyDigest};
use serde::Serialize;

use crate::error::NewsletterError;
use crate::generator::{GenerationOptions, TextGenerator};

/// Content excerpt length per article in the prompt.
pub const CONTENT_EXCERPT_CHARS: usize = 500;

const PROMO_HEADING: &str = "Mehr KI-News und Hintergründe:";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub generation: GenerationOptions,
    /// Appended once at the end of every newsletter when set.
    pub promo_link: Option<String>,
}

/// Where a newsletter's text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NewsletterOrigin {
    Generated,
    Fallback { reason: String },
}

impl NewsletterOrigin {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsletterOrigin::Generated => "generated",
            NewsletterOrigin::Fallback { .. } => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedNewsletter {
    pub content: String,
    pub origin: NewsletterOrigin,
}

/// Headline used for the digest in the archive and the fallback template.
#[must_use]
pub fn newsletter_title(digest: &WeeklyDigest) -> String {
    format!("KI-Newsletter KW {}/{}", digest.week_number, digest.year)
}

/// Build the generation prompt. Articles appear numbered in selection order.
#[must_use]
pub fn build_prompt(digest: &WeeklyDigest) -> String {
    let mut prompt = format!(
        "Erstelle einen ausführlichen deutschsprachigen Newsletter über Künstliche \
         Intelligenz und Technologie für die Kalenderwoche {week}/{year} ({range}).\n\
         Umfang: 1500 bis 2000 Wörter. Format: Markdown mit Überschriften.\n\
         Beginne mit einer kurzen Einleitung, behandle dann jeden der folgenden \
         {count} Artikel in genau der angegebenen Reihenfolge in einem eigenen \
         Abschnitt, ordne ihn ein und verlinke die Quelle. Schließe mit einem \
         kurzen Ausblick.\n\n",
        week = digest.week_number,
        year = digest.year,
        range = digest.date_range,
        count = digest.items.len(),
    );

    for (i, article) in digest.items.iter().enumerate() {
        write_article_block(&mut prompt, i + 1, article);
    }
    prompt
}

fn write_article_block(out: &mut String, number: usize, article: &Article) {
    let _ = writeln!(out, "Artikel {number}:");
    let _ = writeln!(out, "Titel: {}", article.title);
    if !article.description.is_empty() {
        let _ = writeln!(out, "Beschreibung: {}", article.description);
    }
    let _ = writeln!(out, "Quelle: {}", article.source_name);
    let _ = writeln!(out, "Datum: {}", article.pub_date.format("%d.%m.%Y"));
    let _ = writeln!(out, "Link: {}", article.link);
    if let Some(content) = article.content.as_deref() {
        let _ = writeln!(out, "Inhalt: {}", excerpt(content, CONTENT_EXCERPT_CHARS));
    }
    out.push('\n');
}

/// First `max_chars` characters of `text`, with `...` appended when cut.
#[must_use]
pub fn excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Render the digest with the generator. Fails instead of falling back.
///
/// # Errors
///
/// - [`NewsletterError::NoArticles`] if the digest has no items; the
///   generator is not called.
/// - [`NewsletterError::Generation`] if the call fails.
/// - [`NewsletterError::EmptyGeneration`] if the generator returns blank text.
pub async fn render(
    generator: &dyn TextGenerator,
    digest: &WeeklyDigest,
    options: &RenderOptions,
) -> Result<String, NewsletterError> {
    if digest.items.is_empty() {
        return Err(NewsletterError::NoArticles);
    }

    let prompt = build_prompt(digest);
    tracing::debug!(
        week = digest.week_number,
        year = digest.year,
        articles = digest.items.len(),
        prompt_chars = prompt.chars().count(),
        "requesting newsletter generation"
    );

    let raw = generator.generate(&prompt, options.generation).await?;
    let content = strip_code_fence(&raw);
    if content.is_empty() {
        return Err(NewsletterError::EmptyGeneration);
    }

    Ok(append_promo(&content, options.promo_link.as_deref()))
}

/// Render with the generator if there is one, otherwise or on failure use
/// the deterministic template. The origin records which path was taken.
///
/// # Errors
///
/// Returns [`NewsletterError::NoArticles`] if the digest has no items.
pub async fn render_with_fallback(
    generator: Option<&dyn TextGenerator>,
    digest: &WeeklyDigest,
    options: &RenderOptions,
) -> Result<RenderedNewsletter, NewsletterError> {
    if digest.items.is_empty() {
        return Err(NewsletterError::NoArticles);
    }

    let reason = match generator {
        None => "no text generator configured".to_string(),
        Some(generator) => match render(generator, digest, options).await {
            Ok(content) => {
                return Ok(RenderedNewsletter {
                    content,
                    origin: NewsletterOrigin::Generated,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "newsletter generation failed, using fallback template");
                e.to_string()
            }
        },
    };

    Ok(RenderedNewsletter {
        content: fallback_newsletter(digest, options.promo_link.as_deref()),
        origin: NewsletterOrigin::Fallback { reason },
    })
}

/// Deterministic newsletter listing each article with its link. No prose.
#[must_use]
pub fn fallback_newsletter(digest: &WeeklyDigest, promo_link: Option<&str>) -> String {
    let mut out = format!(
        "# {}\n\nZeitraum: {}\n\nDie wichtigsten Artikel dieser Woche:\n\n",
        newsletter_title(digest),
        digest.date_range
    );

    for (i, article) in digest.items.iter().enumerate() {
        let _ = writeln!(out, "## {}. {}\n", i + 1, article.title);
        if !article.description.is_empty() {
            let _ = writeln!(out, "{}\n", article.description);
        }
        let _ = writeln!(
            out,
            "Quelle: {} | {}",
            article.source_name,
            article.pub_date.format("%d.%m.%Y")
        );
        let _ = writeln!(out, "[Weiterlesen]({})\n", article.link);
    }

    append_promo(out.trim_end(), promo_link)
}

/// Append the promo block unless the link is already present.
#[must_use]
pub fn append_promo(content: &str, promo_link: Option<&str>) -> String {
    match promo_link.map(str::trim).filter(|l| !l.is_empty()) {
        Some(link) if !content.contains(link) => {
            format!("{}\n\n---\n\n{PROMO_HEADING} {link}\n", content.trim_end())
        }
        _ => content.to_string(),
    }
}

/// Trim, and unwrap a reply that arrives wrapped in one markdown code fence.
#[must_use]
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed.to_string();
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed.to_string();
    };
    // Drop the info string (`markdown`, `md`, ...) on the opening line.
    let body = match body.split_once('\n') {
        Some((info, body)) if !info.trim().contains(' ') => body,
        _ => body,
    };
    body.trim().to_string()
}

#[cfg(test)]
#[path = "renderer_test.rs"]
mod tests;
