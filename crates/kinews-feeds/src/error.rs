use thiserror::Error;

/// Errors returned while fetching or parsing a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The feed answered with a non-2xx status.
    #[error("feed {url} returned HTTP {status}")]
    Status { status: u16, url: String },

    /// The body is not well-formed XML.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),
}
