use thiserror::Error;

/// Failures of the external text-generation capability.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("generation API returned status {status}: {body}")]
    Api { status: u16, body: String },

    /// The API answered 2xx but the body had no usable completion.
    #[error("malformed generation response: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum NewsletterError {
    #[error("no articles available for the newsletter")]
    NoArticles,

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("text generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("text generation returned empty content")]
    EmptyGeneration,

    #[error("no archived newsletters to answer from")]
    NoArchiveContext,
}
