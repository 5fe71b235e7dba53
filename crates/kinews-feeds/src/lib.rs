//! Feed source boundary: fetch RSS/Atom over HTTP and hand raw entries to
//! the ranking pipeline.

pub mod client;
pub mod error;
pub mod parse;
pub mod search;

pub use client::FeedClient;
pub use error::FeedError;
pub use parse::parse_feed;
pub use search::{google_news_search_url, SEARCH_SOURCE_NAME};
