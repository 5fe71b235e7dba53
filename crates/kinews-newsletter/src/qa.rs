//! Question answering grounded on archived newsletters.

use std::fmt::Write as _;

use crate::error::NewsletterError;
use crate::generator::{GenerationOptions, TextGenerator};
use crate::renderer::excerpt;

/// Newsletters included in one Q&A prompt.
pub const MAX_CONTEXT_NEWSLETTERS: usize = 5;

/// Characters of each newsletter included in the prompt.
pub const MAX_CONTEXT_CHARS: usize = 3000;

/// One archived newsletter as seen by the Q&A prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedIssue {
    pub title: String,
    pub year: i32,
    pub week: i32,
    pub content: String,
}

/// Answer `question` from the given issues, newest first.
///
/// Only the first [`MAX_CONTEXT_NEWSLETTERS`] issues are used.
///
/// # Errors
///
/// - [`NewsletterError::EmptyQuestion`] for a blank question.
/// - [`NewsletterError::NoArchiveContext`] when `issues` is empty.
/// - [`NewsletterError::Generation`] / [`NewsletterError::EmptyGeneration`]
///   from the generator.
///
/// Validation happens before the generator is called.
pub async fn answer_question(
    generator: &dyn TextGenerator,
    question: &str,
    issues: &[ArchivedIssue],
    options: GenerationOptions,
) -> Result<String, NewsletterError> {
    let question = question.trim();
    if question.is_empty() {
        return Err(NewsletterError::EmptyQuestion);
    }
    if issues.is_empty() {
        return Err(NewsletterError::NoArchiveContext);
    }

    let prompt = build_qa_prompt(question, issues);
    let answer = generator.generate(&prompt, options).await?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(NewsletterError::EmptyGeneration);
    }
    Ok(answer.to_string())
}

fn build_qa_prompt(question: &str, issues: &[ArchivedIssue]) -> String {
    let mut prompt = String::from(
        "Du bist ein Assistent für ein Archiv wöchentlicher KI-Newsletter. \
         Beantworte die Frage ausschließlich auf Grundlage der folgenden \
         Newsletter. Wenn die Antwort nicht enthalten ist, sag das offen. \
         Nenne die Kalenderwoche, aus der eine Information stammt.\n\n",
    );

    for issue in issues.iter().take(MAX_CONTEXT_NEWSLETTERS) {
        let _ = writeln!(
            prompt,
            "### {} (KW {}/{})\n{}\n",
            issue.title,
            issue.week,
            issue.year,
            excerpt(&issue.content, MAX_CONTEXT_CHARS)
        );
    }

    let _ = write!(prompt, "Frage: {question}\nAntwort:");
    prompt
}
