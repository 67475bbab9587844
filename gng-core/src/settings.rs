use log::warn;
use serde::{Deserialize, Serialize};

use crate::model::guided_model::{DEFAULT_WORD_LIMIT, GuidedNGramModel};

/// Generation parameters.
///
/// Every field is optional when deserialized; missing ones keep their
/// default. Call [`clamped`](Settings::clamped) before use.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
	/// Size of the n-grams (>= 2).
	pub ngram: usize,
	/// Target number of words per line (>= 1).
	pub length: usize,
	/// Number of lines to generate (>= 1).
	pub count: usize,
	/// Attempts per line to reach a graceful ending (>= 1).
	pub retries: usize,
	/// Words past `length` after which an attempt is abandoned (>= ngram).
	pub word_limit: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			ngram: 3,
			length: 12,
			count: 1,
			retries: 100,
			word_limit: DEFAULT_WORD_LIMIT,
		}
	}
}

impl Settings {
	/// Raises out-of-range values to their minimum, warning for each one.
	pub fn clamped(mut self) -> Self {
		if self.ngram < 2 {
			warn!("ngram size {} set to 2", self.ngram);
			self.ngram = 2;
		}
		if self.length < 1 {
			warn!("length set to 1");
			self.length = 1;
		}
		if self.count < 1 {
			warn!("count set to 1");
			self.count = 1;
		}
		if self.retries < 1 {
			warn!("retries set to 1");
			self.retries = 1;
		}
		if self.word_limit < self.ngram {
			warn!("word limit {} set to {}", self.word_limit, self.ngram);
			self.word_limit = self.ngram;
		}
		if self.length < self.ngram {
			warn!("length {} is less than the ngram size {}", self.length, self.ngram);
		}
		self
	}

	/// Creates an empty model configured by these settings.
	pub fn build_model(&self) -> GuidedNGramModel {
		GuidedNGramModel::new(self.ngram).with_word_limit(self.word_limit)
	}
}
