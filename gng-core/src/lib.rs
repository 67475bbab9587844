//! Guided n-gram line generation library.
//!
//! This crate provides:
//! - Word-level n-gram models steered toward natural line endings
//! - Weighted combination of several corpora
//! - Uniform sampling without replacement with size-based strategy dispatch
//! - Line normalization, generation settings and line readers
//!
//! Typical use: combine corpora, train a model, generate lines.
//!
//! ```
//! use gng_core::{GuidedNGramModel, corpus};
//!
//! let poems = vec!["the cat sat on the mat".to_owned()];
//! let songs = vec!["the dog sat on the log".to_owned()];
//! let lines = corpus::combine(&[poems, songs], &[1.0, 0.5]);
//!
//! let mut model = GuidedNGramModel::new(2);
//! model.train(&lines);
//! let result = model.generate(6, 100);
//! assert!(result.words > 0);
//! ```

/// Guided n-gram model, n-gram extraction and generation results.
pub mod model;

/// Uniform selection of distinct indices.
pub mod sampler;

/// Weighted combination of corpora.
pub mod corpus;

/// Line normalization applied before training.
pub mod normalize;

/// Generation parameters with defaults and clamping.
pub mod settings;

/// Line readers for files and streams.
pub mod io;

mod error;

pub use error::ModelError;
pub use model::{GenerationResult, GuidedNGramModel};
pub use settings::Settings;
