//! Stored article commands: manual import, listing and editing.

use chrono::Utc;
use clap::Subcommand;
use kinews_core::AppConfig;
use kinews_newsletter::GenerationOptions;
use kinews_ranking::CustomSubmission;

/// Sub-commands available under `articles`.
#[derive(Debug, Subcommand)]
pub enum ArticlesCommands {
    /// Import an article by hand
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        link: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// List stored articles of an ISO week, most relevant first
    List {
        /// ISO year (defaults to the current one)
        #[arg(long, requires = "week")]
        year: Option<i32>,
        /// ISO week (defaults to the current one)
        #[arg(long)]
        week: Option<u32>,
    },
    /// Delete a stored article
    Delete { id: i64 },
    /// Replace a stored article's title
    Rename { id: i64, title: String },
    /// Ask the text generator for a better title and store it
    ImproveTitle {
        id: i64,
        /// Print the suggestion without storing it
        #[arg(long)]
        dry_run: bool,
    },
}

pub(crate) async fn run_articles(
    config: &AppConfig,
    command: ArticlesCommands,
) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;

    match command {
        ArticlesCommands::Add {
            title,
            link,
            description,
            content,
        } => {
            let submission = CustomSubmission {
                title,
                link,
                description,
                content,
            };
            let article = kinews_ranking::normalize_custom(&submission, Utc::now())
                .ok_or_else(|| anyhow::anyhow!("title and link must not be empty"))?;
            match kinews_db::insert_article(&pool, &article).await? {
                Some(id) => println!("stored article {id}: {}", article.title),
                None => println!("article already stored: {}", article.title),
            }
        }
        ArticlesCommands::List { year, week } => {
            let digest = crate::resolve_digest(year, week, Utc::now().date_naive())?;
            let scoring = crate::scoring_config(config)?;
            let rows =
                kinews_db::list_articles_for_week(&pool, digest.year, digest.week_number).await?;
            if rows.is_empty() {
                println!(
                    "no articles stored for KW {}/{} ({})",
                    digest.week_number, digest.year, digest.date_range
                );
                return Ok(());
            }

            let stored: Vec<(i64, kinews_core::Article)> = rows
                .into_iter()
                .map(|row| (row.id, row.into_article()))
                .collect();
            let count = stored.len();
            let ranked =
                kinews_ranking::select_top_by(stored, count, Utc::now(), &scoring, |row| &row.1);

            println!("{:<8}{:<7}{:<24}TITLE", "ID", "SCORE", "SOURCE");
            for ((id, article), score) in &ranked {
                println!(
                    "{:<8}{:<7}{:<24}{}",
                    id, score, article.source_name, article.title
                );
            }
        }
        ArticlesCommands::Delete { id } => {
            kinews_db::delete_article(&pool, id)
                .await
                .map_err(|e| anyhow::anyhow!("cannot delete article {id}: {e}"))?;
            println!("deleted article {id}");
        }
        ArticlesCommands::Rename { id, title } => {
            rename(&pool, id, &title).await?;
        }
        ArticlesCommands::ImproveTitle { id, dry_run } => {
            let generator = crate::require_text_generator(config)?;
            let article = load_article(&pool, id).await?;
            let suggestion = kinews_newsletter::improve_title(
                &generator,
                &article,
                GenerationOptions::from_config(config),
            )
            .await?;

            println!("old: {}", article.title);
            println!("new: {suggestion}");
            if dry_run {
                println!("dry-run: title not stored");
            } else {
                rename(&pool, id, &suggestion).await?;
            }
        }
    }

    Ok(())
}

async fn load_article(pool: &sqlx::PgPool, id: i64) -> anyhow::Result<kinews_core::Article> {
    let row = kinews_db::get_article(pool, id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("article {id} not found"))?;
    Ok(row.into_article())
}

async fn rename(pool: &sqlx::PgPool, id: i64, title: &str) -> anyhow::Result<()> {
    let mut article = load_article(pool, id).await?;
    if !article.replace_title(title) {
        anyhow::bail!("title of article {id} unchanged (blank or identical)");
    }
    kinews_db::update_article_title(pool, id, &article.title).await?;
    println!("renamed article {id}: {}", article.title);
    Ok(())
}
