//! The guided n-gram model and its building blocks.
//!
//! - Word n-gram extraction (`ngram`)
//! - Per-prefix table rows (`state`)
//! - Training and guided generation (`GuidedNGramModel`)
//! - Generation outcome (`GenerationResult`)

/// Sliding-window n-gram extraction and table key format.
pub mod ngram;

/// Word-level model with transition, end, start and distance tables.
///
/// Trains from lines and generates with a random walk guided toward
/// natural line endings, with retries.
pub mod guided_model;

/// Result of a generation request.
pub mod generation_result;

/// One row of the per-prefix tables.
///
/// Not exposed publicly.
mod state;

pub use generation_result::GenerationResult;
pub use guided_model::GuidedNGramModel;
