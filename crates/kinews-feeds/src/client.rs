//! HTTP feed client.

use std::time::Duration;

use kinews_core::{AppConfig, FeedSource};
use kinews_ranking::{RawFeedEntry, SourcedEntry};
use reqwest::Client;

use crate::error::FeedError;
use crate::parse::parse_feed;
use crate::search::{google_news_search_url, SEARCH_SOURCE_NAME};

/// Fetches and parses RSS/Atom feeds.
pub struct FeedClient {
    client: Client,
}

impl FeedClient {
    /// # Errors
    ///
    /// Returns [`FeedError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// # Errors
    ///
    /// See [`FeedClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, FeedError> {
        Self::new(config.feed_timeout_secs, &config.feed_user_agent)
    }

    /// Fetch one feed URL and parse its entries.
    ///
    /// # Errors
    ///
    /// - [`FeedError::Http`] on network failure or timeout.
    /// - [`FeedError::Status`] on a non-2xx response.
    /// - [`FeedError::Xml`] if the body is not a well-formed feed.
    pub async fn fetch(&self, url: &str) -> Result<Vec<RawFeedEntry>, FeedError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        parse_feed(&body)
    }

    /// Fetch a feed and tag every entry with `source_name`.
    ///
    /// # Errors
    ///
    /// See [`FeedClient::fetch`].
    pub async fn fetch_as(
        &self,
        url: &str,
        source_name: &str,
    ) -> Result<Vec<SourcedEntry>, FeedError> {
        let entries = self.fetch(url).await?;
        Ok(entries
            .into_iter()
            .map(|entry| SourcedEntry {
                source_name: source_name.to_string(),
                entry,
            })
            .collect())
    }

    /// # Errors
    ///
    /// See [`FeedClient::fetch`].
    pub async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<SourcedEntry>, FeedError> {
        self.fetch_as(&source.url, &source.name).await
    }

    /// Run a news search and return its entries, labeled as search results.
    ///
    /// # Errors
    ///
    /// See [`FeedClient::fetch`].
    pub async fn search(&self, query: &str) -> Result<Vec<SourcedEntry>, FeedError> {
        self.fetch_as(&google_news_search_url(query), SEARCH_SOURCE_NAME)
            .await
    }

    /// Fetch every enabled source in order.
    ///
    /// Continues past individual feed failures, logging warnings. Returns an
    /// empty `Vec` if all feeds fail.
    pub async fn collect(&self, sources: &[FeedSource]) -> Vec<SourcedEntry> {
        let mut entries = Vec::new();

        for source in sources.iter().filter(|s| s.enabled) {
            match self.fetch_source(source).await {
                Ok(fetched) => {
                    tracing::debug!(
                        source = %source.name,
                        count = fetched.len(),
                        "fetched feed"
                    );
                    entries.extend(fetched);
                }
                Err(e) => {
                    tracing::warn!(
                        source = %source.name,
                        url = %source.url,
                        error = %e,
                        "feed fetch failed"
                    );
                }
            }
        }

        tracing::info!(count = entries.len(), "collected feed entries");
        entries
    }
}
