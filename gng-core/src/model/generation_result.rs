use serde::{Deserialize, Serialize};

/// Outcome of a generation request.
///
/// `words` may differ from the requested length even when the ending is graceful.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationResult {
	/// Generated words joined by single spaces.
	pub text: String,
	/// Number of words in `text`.
	pub words: usize,
	/// `true` when the walk stopped on a prefix that ends a training line.
	pub graceful: bool,
	/// Attempt that produced this result, or the attempts consumed when
	/// none of them ended gracefully. 0 for an untrained model.
	pub tries: usize,
}

impl GenerationResult {
	pub(crate) fn from_words(words: &[&str], graceful: bool) -> Self {
		Self {
			text: words.join(" "),
			words: words.len(),
			graceful,
			tries: 1,
		}
	}

	pub(crate) fn with_tries(mut self, tries: usize) -> Self {
		self.tries = tries;
		self
	}
}
