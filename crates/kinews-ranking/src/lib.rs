//! Article ranking for kinews.
//!
//! Turns raw feed records into a deduplicated, scored and trimmed article
//! selection: normalize, deduplicate, score, select. Every stage is pure and
//! excludes bad items instead of failing the batch.

pub mod dedup;
pub mod normalize;
pub mod pipeline;
pub mod raw;
pub mod scorer;
pub mod selector;

pub use dedup::deduplicate;
pub use normalize::{clean_text, normalize_custom, normalize_entry, CustomSubmission};
pub use pipeline::{normalize_batch, rank};
pub use raw::{AtomEntry, RawFeedEntry, RssItem, SourcedEntry};
pub use scorer::relevance_score;
pub use selector::{select_top, select_top_by, Curation, RankedArticle};
