//! Question answering over the newsletter archive.

use kinews_core::AppConfig;
use kinews_db::{NewsletterQuery, NewsletterRow};
use kinews_newsletter::{ArchivedIssue, GenerationOptions};

/// Answer `question` from the `context` most recent archived newsletters.
///
/// # Errors
///
/// Returns an error if no text generator is configured, the archive cannot
/// be read, or the question is rejected or cannot be answered.
pub(crate) async fn run_ask(
    config: &AppConfig,
    question: &str,
    context: usize,
) -> anyhow::Result<()> {
    let generator = crate::require_text_generator(config)?;
    let pool = crate::connect(config).await?;

    let rows = kinews_db::query_newsletters(
        &pool,
        &NewsletterQuery {
            limit: i64::try_from(context)?,
            ..NewsletterQuery::default()
        },
    )
    .await?;
    let issues: Vec<ArchivedIssue> = rows.into_iter().map(archived_issue).collect();
    tracing::debug!(issues = issues.len(), "answering from archive");

    let answer = kinews_newsletter::answer_question(
        &generator,
        question,
        &issues,
        GenerationOptions::from_config(config),
    )
    .await?;
    println!("{answer}");
    Ok(())
}

pub(crate) fn archived_issue(row: NewsletterRow) -> ArchivedIssue {
    ArchivedIssue {
        title: row.title,
        year: row.year,
        week: row.week,
        content: row.content,
    }
}
