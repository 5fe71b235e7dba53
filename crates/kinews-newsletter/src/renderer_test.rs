use super::*;
use crate::error::GenerationError;
use crate::test_support::{article, MockGenerator};

fn digest(count: usize) -> WeeklyDigest {
    let mut digest = WeeklyDigest::new(2025, 42).unwrap();
    digest.ingest(
        (1..=count).map(|i| article(&format!("Artikel {i}"), &format!("https://x.test/{i}"))),
    );
    digest
}

fn options(promo: Option<&str>) -> RenderOptions {
    RenderOptions {
        promo_link: promo.map(str::to_string),
        ..RenderOptions::default()
    }
}

// ---------------------------------------------------------------------------
// Prompt
// ---------------------------------------------------------------------------

#[test]
fn prompt_lists_articles_in_selection_order() {
    let prompt = build_prompt(&digest(3));
    let first = prompt.find("Artikel 1:\nTitel: Artikel 1").unwrap();
    let second = prompt.find("Artikel 2:\nTitel: Artikel 2").unwrap();
    let third = prompt.find("Artikel 3:\nTitel: Artikel 3").unwrap();
    assert!(first < second && second < third);
    assert!(prompt.contains("Kalenderwoche 42/2025 (13.10.2025 - 19.10.2025)"));
    assert!(prompt.contains("Quelle: heise online"));
    assert!(prompt.contains("Datum: 14.10.2025"));
    assert!(prompt.contains("Link: https://x.test/2"));
}

#[test]
fn prompt_caps_content_excerpt() {
    let mut d = digest(0);
    d.items.push(Article {
        content: Some("x".repeat(800)),
        ..article("Lang", "https://x.test/lang")
    });
    let prompt = build_prompt(&d);
    let expected = format!("Inhalt: {}...\n", "x".repeat(CONTENT_EXCERPT_CHARS));
    assert!(prompt.contains(&expected));
    assert!(!prompt.contains(&"x".repeat(CONTENT_EXCERPT_CHARS + 1)));
}

#[test]
fn excerpt_counts_characters_not_bytes() {
    assert_eq!(excerpt("äöü", 2), "äö...");
    assert_eq!(excerpt("äöü", 3), "äöü");
    assert_eq!(excerpt("", 5), "");
}

// ---------------------------------------------------------------------------
// Strict rendering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_articles_fail_before_generation() {
    let generator = MockGenerator::replying("egal");
    let err = render(&generator, &digest(0), &options(None)).await.unwrap_err();
    assert!(matches!(err, NewsletterError::NoArticles));
    assert!(generator.prompts().is_empty());
}

#[tokio::test]
async fn empty_generation_is_a_failure() {
    let generator = MockGenerator::replying("  \n ");
    let err = render(&generator, &digest(2), &options(None)).await.unwrap_err();
    assert!(matches!(err, NewsletterError::EmptyGeneration));
    assert_eq!(generator.prompts().len(), 1);
}

#[tokio::test]
async fn empty_code_fence_is_a_failure() {
    let generator = MockGenerator::replying("```markdown\n```");
    let err = render(&generator, &digest(1), &options(None)).await.unwrap_err();
    assert!(matches!(err, NewsletterError::EmptyGeneration));
}

#[tokio::test]
async fn generation_error_is_propagated() {
    let generator = MockGenerator::failing(503);
    let err = render(&generator, &digest(1), &options(None)).await.unwrap_err();
    assert!(matches!(
        err,
        NewsletterError::Generation(GenerationError::Api { status: 503, .. })
    ));
}

#[tokio::test]
async fn generated_text_gets_promo_once() {
    let generator = MockGenerator::replying("# Newsletter\n\nInhalt");
    let content = render(&generator, &digest(1), &options(Some("https://kinews.test")))
        .await
        .unwrap();
    assert!(content.starts_with("# Newsletter"));
    assert_eq!(content.matches("https://kinews.test").count(), 1);
}

#[tokio::test]
async fn promo_is_not_duplicated_when_generator_included_it() {
    let generator = MockGenerator::replying("Text mit Link https://kinews.test am Ende");
    let content = render(&generator, &digest(1), &options(Some("https://kinews.test")))
        .await
        .unwrap();
    assert_eq!(content, "Text mit Link https://kinews.test am Ende");
}

// ---------------------------------------------------------------------------
// Fallback
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fallback_without_generator_is_labeled() {
    let rendered = render_with_fallback(None, &digest(2), &options(None)).await.unwrap();
    assert_eq!(
        rendered.origin,
        NewsletterOrigin::Fallback {
            reason: "no text generator configured".to_string()
        }
    );
    assert!(rendered.content.contains("[Weiterlesen](https://x.test/2)"));
}

#[tokio::test]
async fn fallback_after_failure_keeps_reason() {
    let generator = MockGenerator::failing(500);
    let generator: &dyn TextGenerator = &generator;
    let rendered = render_with_fallback(Some(generator), &digest(1), &options(None))
        .await
        .unwrap();
    assert_eq!(rendered.origin.as_str(), "fallback");
    match rendered.origin {
        NewsletterOrigin::Fallback { reason } => assert!(reason.contains("500")),
        NewsletterOrigin::Generated => panic!("expected fallback"),
    }
}

#[tokio::test]
async fn successful_generation_is_labeled_generated() {
    let generator = MockGenerator::replying("Fertig");
    let generator: &dyn TextGenerator = &generator;
    let rendered = render_with_fallback(Some(generator), &digest(1), &options(None))
        .await
        .unwrap();
    assert_eq!(rendered.origin, NewsletterOrigin::Generated);
    assert_eq!(rendered.content, "Fertig");
}

#[tokio::test]
async fn fallback_still_rejects_empty_digest() {
    let err = render_with_fallback(None, &digest(0), &options(None)).await.unwrap_err();
    assert!(matches!(err, NewsletterError::NoArticles));
}

#[test]
fn fallback_template_is_deterministic_and_ordered() {
    let d = digest(2);
    let a = fallback_newsletter(&d, Some("https://kinews.test"));
    let b = fallback_newsletter(&d, Some("https://kinews.test"));
    assert_eq!(a, b);
    assert!(a.starts_with("# KI-Newsletter KW 42/2025\n\nZeitraum: 13.10.2025 - 19.10.2025"));
    assert!(a.find("## 1. Artikel 1").unwrap() < a.find("## 2. Artikel 2").unwrap());
    assert!(a.contains("Quelle: heise online | 14.10.2025"));
    assert!(a.ends_with("Mehr KI-News und Hintergründe: https://kinews.test\n"));
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[test]
fn append_promo_ignores_blank_link() {
    assert_eq!(append_promo("Text", Some("  ")), "Text");
    assert_eq!(append_promo("Text", None), "Text");
}

#[test]
fn strip_code_fence_variants() {
    assert_eq!(strip_code_fence("  Hallo  "), "Hallo");
    assert_eq!(strip_code_fence("```markdown\n# Titel\nText\n```"), "# Titel\nText");
    assert_eq!(strip_code_fence("```\nText\n```"), "Text");
    assert_eq!(strip_code_fence("```Text```"), "Text");
    assert_eq!(strip_code_fence("```rust\nfn main() {}"), "```rust\nfn main() {}");
}
