//! Newsletter generation from the stored articles of one ISO week.

use chrono::Utc;
use clap::Subcommand;
use kinews_core::{AppConfig, Article};
use kinews_newsletter::{NewsletterOrigin, RenderOptions, TextGenerator};
use kinews_ranking::Curation;

/// Sub-commands available under `newsletter`.
#[derive(Debug, Subcommand)]
pub enum NewsletterCommands {
    /// Select the week's top articles and write the newsletter
    Generate {
        /// ISO year (defaults to the current one)
        #[arg(long, requires = "week")]
        year: Option<i32>,
        /// ISO week (defaults to the current one)
        #[arg(long)]
        week: Option<u32>,
        /// Number of articles to select (defaults to `KINEWS_TOP_N`)
        #[arg(long)]
        top: Option<usize>,
        /// Use exactly these article ids, in this order, instead of the ranking
        #[arg(long = "pick", value_name = "ID", num_args = 1..)]
        pick: Vec<i64>,
        /// Skip the text generator and use the plain template
        #[arg(long)]
        fallback: bool,
        /// Store the result in the archive
        #[arg(long)]
        save: bool,
    },
}

pub(crate) async fn run_newsletter(
    config: &AppConfig,
    command: NewsletterCommands,
) -> anyhow::Result<()> {
    match command {
        NewsletterCommands::Generate {
            year,
            week,
            top,
            pick,
            fallback,
            save,
        } => {
            let options = GenerateOptions {
                year,
                week,
                top: top.unwrap_or(config.top_n),
                pick,
                fallback,
                save,
            };
            run_generate(config, options).await
        }
    }
}

struct GenerateOptions {
    year: Option<i32>,
    week: Option<u32>,
    top: usize,
    pick: Vec<i64>,
    fallback: bool,
    save: bool,
}

/// Build the weekly digest, render it and optionally archive it.
///
/// A failed or unconfigured text generator falls back to the template; the
/// origin is printed and stored so the two are never confused.
///
/// # Errors
///
/// Returns an error if the week is invalid, a picked id does not exist, the
/// selection is empty, or a database call fails.
async fn run_generate(config: &AppConfig, options: GenerateOptions) -> anyhow::Result<()> {
    let now = Utc::now();
    let mut digest = crate::resolve_digest(options.year, options.week, now.date_naive())?;
    let scoring = crate::scoring_config(config)?;
    let pool = crate::connect(config).await?;

    let stored: Vec<Article> =
        kinews_db::list_articles_for_week(&pool, digest.year, digest.week_number)
            .await?
            .into_iter()
            .map(kinews_db::ArticleRow::into_article)
            .collect();

    let mut curation = Curation::new(options.top);
    if !options.pick.is_empty() {
        let mut picked = Vec::with_capacity(options.pick.len());
        for id in &options.pick {
            let row = kinews_db::get_article(&pool, *id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("article {id} not found"))?;
            picked.push(row.into_article());
        }
        curation.set_override(picked);
    }

    let selection = curation.selection(&stored, now, &scoring);
    tracing::info!(
        week = digest.week_number,
        year = digest.year,
        pool = stored.len(),
        selected = selection.len(),
        manual = curation.is_overridden(),
        "newsletter selection ready"
    );
    digest.ingest(selection);
    if digest.items.is_empty() {
        anyhow::bail!(
            "no articles stored for KW {}/{}; run `kinews fetch --save` first",
            digest.week_number,
            digest.year
        );
    }

    let client = if options.fallback {
        None
    } else {
        crate::text_generator(config)?
    };
    let render_options = RenderOptions {
        generation: kinews_newsletter::GenerationOptions::from_config(config),
        promo_link: config.promo_link.clone(),
    };
    let rendered = kinews_newsletter::render_with_fallback(
        client.as_ref().map(|c| c as &dyn TextGenerator),
        &digest,
        &render_options,
    )
    .await?;

    if let NewsletterOrigin::Fallback { reason } = &rendered.origin {
        eprintln!("note: using the fallback template ({reason})");
    }
    let origin = rendered.origin.as_str();
    digest.set_generated_content(rendered.content);

    let title = kinews_newsletter::newsletter_title(&digest);
    let content = digest.generated_content.as_deref().unwrap_or_default();
    println!("# {title}\n");
    println!("{content}");

    if options.save {
        let links: Vec<String> = digest.items.iter().map(|a| a.link.clone()).collect();
        let week = i32::try_from(digest.week_number)?;
        let saved = kinews_db::save_newsletter(
            &pool,
            &kinews_db::NewNewsletter {
                year: digest.year,
                week,
                date_range: &digest.date_range,
                title: &title,
                content,
                origin,
                article_links: &links,
            },
        )
        .await?;
        eprintln!("archived as {}", saved.public_id);
    }

    Ok(())
}
