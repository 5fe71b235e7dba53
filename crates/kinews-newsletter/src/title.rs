//! Headline rewriting.

use kinews_core::Article;

use crate::error::NewsletterError;
use crate::generator::{GenerationOptions, TextGenerator};

const TITLE_MAX_TOKENS: u32 = 60;

const QUOTES: &[char] = &['"', '\'', '„', '“', '”', '«', '»', '‚', '‘', '’'];

/// Ask the generator for a sharper German headline for `article`.
///
/// Only the first non-empty line of the reply is used, with surrounding
/// quotes removed. The article itself is not modified.
///
/// # Errors
///
/// Returns [`NewsletterError::Generation`] on call failure and
/// [`NewsletterError::EmptyGeneration`] when nothing usable comes back.
pub async fn improve_title(
    generator: &dyn TextGenerator,
    article: &Article,
    options: GenerationOptions,
) -> Result<String, NewsletterError> {
    let mut prompt = format!(
        "Formuliere eine prägnante, informative deutsche Überschrift für einen \
         Newsletter-Beitrag. Antworte nur mit der Überschrift, ohne \
         Anführungszeichen.\n\nAktueller Titel: {}\n",
        article.title
    );
    if !article.description.is_empty() {
        prompt.push_str("Beschreibung: ");
        prompt.push_str(&article.description);
        prompt.push('\n');
    }

    let reply = generator
        .generate(&prompt, options.with_max_tokens(TITLE_MAX_TOKENS))
        .await?;
    let title = clean_title(&reply);
    if title.is_empty() {
        return Err(NewsletterError::EmptyGeneration);
    }
    tracing::debug!(old = %article.title, new = %title, "improved title");
    Ok(title)
}

fn clean_title(reply: &str) -> String {
    let line = reply
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    let line = line.strip_prefix("Überschrift:").unwrap_or(line);
    line.trim().trim_matches(QUOTES).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{article, MockGenerator};

    #[test]
    fn clean_title_strips_quotes_and_label() {
        assert_eq!(clean_title("\"OpenAI zeigt GPT-5\""), "OpenAI zeigt GPT-5");
        assert_eq!(clean_title("„KI im Mittelstand“"), "KI im Mittelstand");
        assert_eq!(clean_title("\n\nÜberschrift: Neue Chips\nWeitere Zeile"), "Neue Chips");
        assert_eq!(clean_title("  \"\"  "), "");
    }

    #[tokio::test]
    async fn returns_cleaned_title_and_sends_context() {
        let generator = MockGenerator::replying("'Nvidia verdoppelt KI-Leistung'\n");
        let a = article("Nvidia neue GPU", "https://x.test/1");
        let title = improve_title(&generator, &a, GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(title, "Nvidia verdoppelt KI-Leistung");

        let prompts = generator.prompts();
        assert!(prompts[0].contains("Aktueller Titel: Nvidia neue GPU"));
        assert!(prompts[0].contains("Beschreibung: Beschreibung zu Nvidia neue GPU"));
    }

    #[tokio::test]
    async fn quote_only_reply_is_a_failure() {
        let generator = MockGenerator::replying("\"\"");
        let a = article("Titel", "https://x.test/1");
        let err = improve_title(&generator, &a, GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, NewsletterError::EmptyGeneration));
    }
}
