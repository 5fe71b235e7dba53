//! Read-only archive queries.

use clap::Subcommand;
use kinews_core::AppConfig;
use kinews_db::NewsletterQuery;
use uuid::Uuid;

/// Sub-commands available under `archive`.
#[derive(Debug, Subcommand)]
pub enum ArchiveCommands {
    /// List archived newsletters, newest first
    List {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        week: Option<i32>,
        /// Case-insensitive text search in title and content
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value = "20")]
        limit: i64,
    },
    /// Print one archived newsletter
    Show { id: Uuid },
}

pub(crate) async fn run_archive(
    config: &AppConfig,
    command: ArchiveCommands,
) -> anyhow::Result<()> {
    let pool = crate::connect(config).await?;

    match command {
        ArchiveCommands::List {
            year,
            week,
            search,
            limit,
        } => {
            let rows = kinews_db::query_newsletters(
                &pool,
                &NewsletterQuery {
                    year,
                    week,
                    text: search,
                    limit,
                },
            )
            .await?;

            if rows.is_empty() {
                println!("no archived newsletters found");
                return Ok(());
            }

            println!("{:<38}{:<10}{:<18}{:<11}TITLE", "ID", "WEEK", "CREATED", "ORIGIN");
            for row in &rows {
                println!(
                    "{:<38}{:<10}{:<18}{:<11}{}",
                    row.public_id,
                    format!("{}/{}", row.week, row.year),
                    row.created_at.format("%Y-%m-%d %H:%M"),
                    row.origin,
                    row.title
                );
            }
        }
        ArchiveCommands::Show { id } => {
            let row = kinews_db::get_newsletter(&pool, id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("newsletter {id} not found"))?;

            println!("# {}", row.title);
            println!("{} ({})\n", row.date_range, row.origin);
            println!("{}", row.content);

            let links = row.links();
            if !links.is_empty() {
                println!("\nQuellen:");
                for link in links {
                    println!("- {link}");
                }
            }
        }
    }

    Ok(())
}
