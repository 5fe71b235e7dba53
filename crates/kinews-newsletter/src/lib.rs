//! Newsletter generation for kinews.
//!
//! Renders a weekly digest through an external text-generation capability,
//! falls back to a deterministic template, and answers questions over the
//! archive.

pub mod error;
pub mod generator;
pub mod qa;
pub mod renderer;
pub mod title;

#[cfg(test)]
mod test_support;

pub use error::{GenerationError, NewsletterError};
pub use generator::{ChatCompletionClient, GenerationOptions, TextGenerator};
pub use qa::{answer_question, ArchivedIssue};
pub use renderer::{
    fallback_newsletter, newsletter_title, render, render_with_fallback, NewsletterOrigin,
    RenderOptions, RenderedNewsletter,
};
pub use title::improve_title;
