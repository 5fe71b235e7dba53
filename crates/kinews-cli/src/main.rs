mod archive;
mod articles;
mod ask;
mod feeds;
mod newsletter;

use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use kinews_core::{AppConfig, WeeklyDigest};
use kinews_newsletter::qa::MAX_CONTEXT_NEWSLETTERS;
use tracing_subscriber::EnvFilter;

use crate::archive::ArchiveCommands;
use crate::articles::ArticlesCommands;
use crate::feeds::FeedsCommands;
use crate::newsletter::NewsletterCommands;

#[derive(Debug, Parser)]
#[command(name = "kinews")]
#[command(about = "Weekly AI newsletter curation")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Inspect the configured feed sources
    Feeds {
        #[command(subcommand)]
        command: FeedsCommands,
    },
    /// Fetch feeds and print the most relevant articles
    Fetch {
        /// Fetch only this configured feed (by name)
        #[arg(long)]
        feed: Option<String>,
        /// Also run a news search for this query
        #[arg(long)]
        query: Option<String>,
        /// Number of articles to show (defaults to `KINEWS_TOP_N`)
        #[arg(long)]
        top: Option<usize>,
        /// Store every fetched article in the database
        #[arg(long)]
        save: bool,
    },
    /// Manage stored articles
    Articles {
        #[command(subcommand)]
        command: ArticlesCommands,
    },
    /// Generate newsletters
    Newsletter {
        #[command(subcommand)]
        command: NewsletterCommands,
    },
    /// Browse archived newsletters
    Archive {
        #[command(subcommand)]
        command: ArchiveCommands,
    },
    /// Ask a question about the archived newsletters
    Ask {
        question: String,
        /// Number of recent newsletters used as context (1 to 5)
        #[arg(
            long,
            default_value_t = MAX_CONTEXT_NEWSLETTERS,
            value_parser = parse_context
        )]
        context: usize,
    },
}

fn parse_context(raw: &str) -> Result<usize, String> {
    let n: usize = raw.parse().map_err(|e| format!("{e}"))?;
    if (1..=MAX_CONTEXT_NEWSLETTERS).contains(&n) {
        Ok(n)
    } else {
        Err(format!("must be between 1 and {MAX_CONTEXT_NEWSLETTERS}"))
    }
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = kinews_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let Some(command) = cli.command else {
        println!("kinews: no command given; see `kinews --help`");
        return Ok(());
    };

    match command {
        Commands::Db { command } => run_db(&config, command).await,
        Commands::Feeds { command } => feeds::run_feeds(&config, command),
        Commands::Fetch {
            feed,
            query,
            top,
            save,
        } => feeds::run_fetch(&config, feed.as_deref(), query.as_deref(), top, save).await,
        Commands::Articles { command } => articles::run_articles(&config, command).await,
        Commands::Newsletter { command } => newsletter::run_newsletter(&config, command).await,
        Commands::Archive { command } => archive::run_archive(&config, command).await,
        Commands::Ask { question, context } => ask::run_ask(&config, &question, context).await,
    }
}

async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = connect(config).await?;
    match command {
        DbCommands::Ping => {
            kinews_db::health_check(&pool).await?;
            println!("database reachable");
        }
        DbCommands::Migrate => {
            let applied = kinews_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
    }
    Ok(())
}

/// Open a pool, failing early with a readable message when no database is configured.
pub(crate) async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    kinews_db::connect_pool_from_config(config)
        .await
        .map_err(|e| anyhow::anyhow!("database unavailable: {e}"))
}

/// Chat-completion client, or `None` when no API key is configured.
pub(crate) fn text_generator(
    config: &AppConfig,
) -> anyhow::Result<Option<kinews_newsletter::ChatCompletionClient>> {
    kinews_newsletter::ChatCompletionClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build text generation client: {e}"))
}

/// Like [`text_generator`], but a missing key is an error.
pub(crate) fn require_text_generator(
    config: &AppConfig,
) -> anyhow::Result<kinews_newsletter::ChatCompletionClient> {
    text_generator(config)?.ok_or_else(|| {
        anyhow::anyhow!("KINEWS_LLM_API_KEY is not set; this command needs a text generator")
    })
}

/// Empty digest for the requested ISO week. Without `week`, the week
/// containing `today`; without `year`, the ISO year of `today`.
pub(crate) fn resolve_digest(
    year: Option<i32>,
    week: Option<u32>,
    today: NaiveDate,
) -> anyhow::Result<WeeklyDigest> {
    match week {
        None => Ok(WeeklyDigest::for_date(today)),
        Some(week) => {
            let year = year.unwrap_or_else(|| today.iso_week().year());
            WeeklyDigest::new(year, week)
                .ok_or_else(|| anyhow::anyhow!("ISO week {week} does not exist in {year}"))
        }
    }
}

/// Scoring weights from the feeds file.
pub(crate) fn scoring_config(config: &AppConfig) -> anyhow::Result<kinews_core::ScoringConfig> {
    Ok(kinews_core::load_feeds(&config.feeds_path)?.scoring)
}
