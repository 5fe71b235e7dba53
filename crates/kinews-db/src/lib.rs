//! Postgres storage for fetched articles and the newsletter archive.

pub mod articles;
mod error;
pub mod newsletters;
mod pool;

pub use articles::{
    article_fingerprint, delete_article, get_article, insert_article, list_articles_for_week,
    update_article_title, ArticleRow,
};
pub use error::DbError;
pub use newsletters::{
    get_newsletter, query_newsletters, save_newsletter, NewNewsletter, NewsletterQuery,
    NewsletterRow,
};
pub use pool::{connect_pool, connect_pool_from_config, health_check, run_migrations, PoolConfig};
