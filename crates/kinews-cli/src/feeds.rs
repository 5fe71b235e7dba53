//! Feed source inspection and the `fetch` command.

use chrono::Utc;
use clap::Subcommand;
use kinews_core::AppConfig;
use kinews_feeds::FeedClient;

/// Sub-commands available under `feeds`.
#[derive(Debug, Subcommand)]
pub enum FeedsCommands {
    /// List configured feed sources
    List,
}

pub(crate) fn run_feeds(config: &AppConfig, command: FeedsCommands) -> anyhow::Result<()> {
    match command {
        FeedsCommands::List => {
            let feeds = kinews_core::load_feeds(&config.feeds_path)?;
            println!("{:<28}{:<9}URL", "NAME", "ENABLED");
            for feed in &feeds.feeds {
                println!(
                    "{:<28}{:<9}{}",
                    feed.name,
                    if feed.enabled { "yes" } else { "no" },
                    feed.url
                );
            }
            println!(
                "{} feed(s), {} enabled",
                feeds.feeds.len(),
                feeds.enabled().count()
            );
            Ok(())
        }
    }
}

/// Fetch, normalize and rank articles, printing the top selection.
///
/// Without `feed_name` every enabled source is fetched; per-feed failures are
/// logged and skipped. A named feed or an explicit `query` that fails aborts
/// the command. With `save`, the whole deduplicated pool is stored, not just
/// the printed selection.
///
/// # Errors
///
/// Returns an error if the feeds file cannot be loaded, the named feed does
/// not exist, a requested fetch fails, or storing articles fails.
pub(crate) async fn run_fetch(
    config: &AppConfig,
    feed_name: Option<&str>,
    query: Option<&str>,
    top: Option<usize>,
    save: bool,
) -> anyhow::Result<()> {
    let feeds = kinews_core::load_feeds(&config.feeds_path)?;
    let client = FeedClient::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build feed client: {e}"))?;

    let mut entries = match feed_name {
        Some(name) => {
            let source = feeds.find(name).ok_or_else(|| {
                anyhow::anyhow!(
                    "feed '{name}' not found in {}",
                    config.feeds_path.display()
                )
            })?;
            client.fetch_source(source).await?
        }
        None => client.collect(&feeds.feeds).await,
    };

    if let Some(query) = query {
        let found = client.search(query).await?;
        tracing::info!(query, count = found.len(), "search feed fetched");
        entries.extend(found);
    }

    let now = Utc::now();
    let articles = kinews_ranking::normalize_batch(&entries, now);
    if articles.is_empty() {
        println!("no articles found");
        return Ok(());
    }

    let ranked = kinews_ranking::rank(
        articles.clone(),
        top.unwrap_or(config.top_n),
        now,
        &feeds.scoring,
    );

    println!("{:<7}{:<24}{:<12}TITLE", "SCORE", "SOURCE", "DATE");
    for item in &ranked {
        println!(
            "{:<7}{:<24}{:<12}{}",
            item.score,
            item.article.source_name,
            item.article.pub_date.format("%d.%m.%Y"),
            item.article.title
        );
        println!("{:<43}{}", "", item.article.link);
    }
    println!("{} of {} article(s) shown", ranked.len(), articles.len());

    if save {
        let pool = crate::connect(config).await?;
        let mut stored = 0usize;
        for article in &articles {
            if kinews_db::insert_article(&pool, article).await?.is_some() {
                stored += 1;
            }
        }
        println!(
            "stored {stored} new article(s), {} already present",
            articles.len() - stored
        );
    }

    Ok(())
}
