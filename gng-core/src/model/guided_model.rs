use std::collections::HashMap;

use log::{debug, trace};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::generation_result::GenerationResult;
use super::ngram::{KEY_SEPARATOR, extract, join_key};
use super::state::PrefixState;
use crate::error::ModelError;
use crate::normalize::normalize;

/// Default number of words past the target length after which a single
/// attempt gives up.
pub const DEFAULT_WORD_LIMIT: usize = 4096;

/// Word-level n-gram model that steers generation toward natural line endings.
///
/// The model learns, for every prefix of `n - 1` words:
/// - the words that followed it (transition table)
/// - the words that followed it on the last n-gram of a line (end table)
/// - the fewest n-grams left to the end of a line (distance table)
///
/// and the prefixes that started a line (start list).
///
/// # Invariants
/// - `n` is always >= 2
/// - All tables use keys built with [`KEY_SEPARATOR`]
/// - Tables only grow: [`train`](Self::train) and [`merge`](Self::merge)
///   accumulate, nothing is ever reset
///
/// # Concurrency
/// Generation only takes `&self`; a trained model can be shared between
/// threads once training is over.
#[derive(Clone, Debug)]
pub struct GuidedNGramModel {
	n: usize,
	/// Transition, end and distance tables, one row per prefix.
	states: HashMap<String, PrefixState>,
	/// Prefixes seen on the first n-gram of a line, duplicates kept.
	start: Vec<String>,
	/// Words allowed past the target length; safety valve against cycles
	/// with no reachable ending.
	word_limit: usize,
}

impl GuidedNGramModel {
	/// Creates an empty model of order `n`.
	///
	/// `n` below 2 cannot generate anything and is raised to 2.
	pub fn new(n: usize) -> Self {
		let n = n.max(2);
		Self {
			n,
			states: HashMap::new(),
			start: Vec::new(),
			word_limit: DEFAULT_WORD_LIMIT.max(n),
		}
	}

	/// Sets how many words past the target length an attempt may run before
	/// it stops without a graceful ending.
	///
	/// Clamped to at least `n`.
	pub fn with_word_limit(mut self, word_limit: usize) -> Self {
		self.set_word_limit(word_limit);
		self
	}

	pub fn set_word_limit(&mut self, word_limit: usize) {
		self.word_limit = word_limit.max(self.n);
	}

	pub fn word_limit(&self) -> usize {
		self.word_limit
	}

	/// Order of the model.
	pub fn n(&self) -> usize {
		self.n
	}

	/// `true` until a line yielding at least one n-gram was trained.
	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Number of distinct prefixes known.
	pub fn prefix_count(&self) -> usize {
		self.states.len()
	}

	/// Number of start occurrences (duplicates included).
	pub fn start_count(&self) -> usize {
		self.start.len()
	}

	/// Minimum number of n-grams from `prefix` to the end of a training line.
	pub fn distance(&self, prefix: &str) -> Option<usize> {
		self.states.get(prefix)?.distance()
	}

	/// Observed continuations of `prefix`, in training order.
	pub fn successors(&self, prefix: &str) -> Option<&[String]> {
		self.states.get(prefix).map(PrefixState::successors)
	}

	/// Words observed after `prefix` on the last n-gram of a line.
	///
	/// `Some` with an empty slice still means `prefix` ends a line.
	pub fn endings(&self, prefix: &str) -> Option<&[String]> {
		self.states.get(prefix)?.endings()
	}

	/// Trains the model with raw lines.
	///
	/// # Behavior
	/// - Blank lines are skipped.
	/// - Each line is normalized, then split into n-grams; lines too short
	///   for a single n-gram are skipped.
	/// - For the n-gram at index `i` of a line with `G` n-grams:
	///   - its suffix is appended to the prefix successors
	///   - the prefix distance becomes `min(distance, G - i)`
	///   - the first n-gram registers a start, otherwise the last one
	///     registers an ending (a single n-gram line is only a start)
	///
	/// # Notes
	/// Calling `train` again adds to what is already known.
	pub fn train<I, S>(&mut self, lines: I)
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut seen = 0;
		let mut used = 0;
		for line in lines {
			seen += 1;
			if self.train_line(line.as_ref()) {
				used += 1;
			}
		}
		debug!(
			"trained {used}/{seen} lines (n = {}), {} prefixes, {} starts",
			self.n,
			self.states.len(),
			self.start.len()
		);
	}

	/// Returns `false` when the line contributed nothing.
	fn train_line(&mut self, line: &str) -> bool {
		if line.trim().is_empty() {
			return false;
		}

		let line = normalize(line);
		let grams = extract(&line, self.n);
		let count = grams.len();
		if count == 0 {
			return false;
		}

		for (i, gram) in grams.iter().enumerate() {
			let key = gram.prefix_key();
			let suffix = gram.suffix();

			let state = self.states.entry(key.clone()).or_default();
			state.add_successor(suffix);
			state.observe_distance(count - i);

			if i == 0 {
				self.start.push(key);
			} else if i == count - 1 {
				state.add_ending(suffix);
			}
		}
		true
	}

	/// Keeps the candidates that do not move away from a line ending.
	///
	/// A candidate is kept when the prefix it would create has a known
	/// distance no larger than the distance of `prefix`. When `prefix` has no
	/// distance, or no candidate qualifies, every candidate is returned:
	/// guidance must never create a dead end.
	fn guide_towards_end<'a>(&self, prefix: &str, candidates: &'a [String]) -> Vec<&'a str> {
		let all = candidates.iter().map(String::as_str);
		let Some(current) = self.distance(prefix) else {
			return all.collect();
		};

		let mut words: Vec<&str> = prefix.split(KEY_SEPARATOR).skip(1).collect();
		let good: Vec<&'a str> = all
			.clone()
			.filter(|next| {
				words.push(*next);
				let key = join_key(&words);
				words.pop();
				self.distance(&key).is_some_and(|d| d <= current)
			})
			.collect();

		if good.is_empty() { all.collect() } else { good }
	}

	/// Single generation attempt using the thread-local generator.
	///
	/// See [`attempt_with`](Self::attempt_with).
	pub fn attempt(&self, length: usize) -> GenerationResult {
		self.attempt_with(length, &mut rand::rng())
	}

	/// Single generation attempt aiming at `length` words.
	///
	/// # Behavior
	/// - An untrained model returns an empty result with 0 tries.
	/// - Starts from a random start prefix (frequent starts are more likely).
	/// - Stops gracefully on a prefix that ended a training line once the
	///   output has at least `length - 1` words, appending one of its endings.
	/// - Past `length` words, successors are filtered toward an ending.
	/// - Stops without a graceful ending on a prefix with no successor or
	///   once the output holds `length + word_limit` words.
	///
	/// `length` below 1 is raised to 1.
	pub fn attempt_with<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> GenerationResult {
		let length = length.max(1);
		if self.states.is_empty() {
			return GenerationResult::default();
		}
		let Some(seed) = self.start.choose(rng) else {
			return GenerationResult::default();
		};

		let cap = length.saturating_add(self.word_limit);
		let mut output: Vec<&str> = seed.split(KEY_SEPARATOR).collect();
		let mut prefix = seed.clone();
		let mut graceful = false;

		loop {
			let state = self.states.get(&prefix);

			if let Some(endings) = state.and_then(PrefixState::endings) {
				if output.len() + 1 >= length {
					if let Some(last) = endings.choose(rng) {
						output.push(last);
					}
					graceful = true;
					break;
				}
			}

			if output.len() >= cap {
				trace!("word cap {cap} reached at '{prefix}'");
				break;
			}

			let candidates = match state.map(PrefixState::successors) {
				Some(candidates) if !candidates.is_empty() => candidates,
				_ => break,
			};

			let next = if output.len() >= length {
				self.guide_towards_end(&prefix, candidates).choose(rng).copied()
			} else {
				candidates.choose(rng).map(String::as_str)
			};
			let Some(next) = next else { break };

			output.push(next);
			prefix = join_key(&output[output.len() - (self.n - 1)..]);
		}

		trace!("attempt: {} words, graceful = {graceful}", output.len());
		GenerationResult::from_words(&output, graceful)
	}

	/// Best-effort generation using the thread-local generator.
	///
	/// See [`generate_with`](Self::generate_with).
	pub fn generate(&self, length: usize, max_tries: usize) -> GenerationResult {
		self.generate_with(length, max_tries, &mut rand::rng())
	}

	/// Retries single attempts until one ends gracefully.
	///
	/// # Returns
	/// - The first graceful attempt, with `tries` set to its attempt number.
	/// - Otherwise the attempt with the most words (the earliest on ties),
	///   with `tries` set to `max_tries`.
	/// - An empty result with 0 tries for an untrained model.
	///
	/// `max_tries` below 1 is raised to 1.
	pub fn generate_with<R: Rng + ?Sized>(&self, length: usize, max_tries: usize, rng: &mut R) -> GenerationResult {
		if self.states.is_empty() {
			return GenerationResult::default();
		}
		let max_tries = max_tries.max(1);

		let mut best: Option<GenerationResult> = None;
		for attempt in 1..=max_tries {
			let result = self.attempt_with(length, rng);
			if result.graceful {
				return result.with_tries(attempt);
			}
			if best.as_ref().is_none_or(|b| result.words > b.words) {
				best = Some(result);
			}
		}

		debug!("no graceful ending after {max_tries} tries, keeping the longest attempt");
		best.unwrap_or_default().with_tries(max_tries)
	}

	/// Merges another model of the same order into this one.
	///
	/// # Behavior
	/// - Successor, ending and start lists are appended.
	/// - Distances keep the minimum of both models.
	/// - The word limit of `self` is kept.
	///
	/// # Errors
	/// Returns [`ModelError::OrderMismatch`] if the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<(), ModelError> {
		if self.n != other.n {
			return Err(ModelError::OrderMismatch { expected: self.n, found: other.n });
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state);
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}
		self.start.extend(other.start.iter().cloned());

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn rng() -> StdRng {
		StdRng::seed_from_u64(0xC0FFEE)
	}

	#[test]
	fn order_is_clamped() {
		assert_eq!(GuidedNGramModel::new(0).n(), 2);
		assert_eq!(GuidedNGramModel::new(1).n(), 2);
		assert_eq!(GuidedNGramModel::new(5).n(), 5);
	}

	#[test]
	fn empty_model_returns_zero_result() {
		let model = GuidedNGramModel::new(3);
		assert_eq!(model.attempt(10), GenerationResult::default());
		assert_eq!(model.generate(10, 50), GenerationResult::default());
	}

	#[test]
	fn blank_and_short_lines_are_skipped() {
		let mut model = GuidedNGramModel::new(3);
		model.train(["", "   ", "too short", "...!"]);
		assert!(model.is_empty());
		assert_eq!(model.start_count(), 0);
	}

	#[test]
	fn training_fills_tables() {
		let mut model = GuidedNGramModel::new(2);
		model.train(["The cat sat.", "the cat ran"]);

		assert_eq!(model.start_count(), 2);
		assert_eq!(model.successors("the"), Some(&["cat".to_owned(), "cat".to_owned()][..]));
		assert_eq!(model.successors("cat"), Some(&["sat".to_owned(), "ran".to_owned()][..]));
		assert_eq!(model.endings("cat"), Some(&["sat".to_owned(), "ran".to_owned()][..]));
		assert_eq!(model.endings("the"), None);
		assert_eq!(model.distance("the"), Some(2));
		assert_eq!(model.distance("cat"), Some(1));
	}

	#[test]
	fn distance_is_the_minimum() {
		let mut model = GuidedNGramModel::new(2);
		// "b" is 4 n-grams from the end here...
		model.train(["a b c d e f"]);
		assert_eq!(model.distance("b"), Some(4));
		// ...and 1 here
		model.train(["x b y"]);
		assert_eq!(model.distance("b"), Some(1));
		model.train(["q r s t b u v w"]);
		assert_eq!(model.distance("b"), Some(1));
	}

	#[test]
	fn single_ngram_line_is_only_a_start() {
		let mut model = GuidedNGramModel::new(3);
		model.train(["one two three"]);
		assert_eq!(model.start_count(), 1);
		assert_eq!(model.endings("one two"), None);
		assert_eq!(model.distance("one two"), Some(1));
	}

	#[test]
	fn training_accumulates() {
		let mut model = GuidedNGramModel::new(2);
		model.train(["a b c"]);
		model.train(["a b d"]);
		assert_eq!(model.start_count(), 2);
		assert_eq!(model.successors("b").map(<[String]>::len), Some(2));
		assert_eq!(model.endings("b").map(<[String]>::len), Some(2));
	}

	#[test]
	fn cat_lines_end_gracefully() {
		let mut model = GuidedNGramModel::new(2);
		model.train(["the cat sat", "the cat ran"]);
		let mut rng = rng();
		for _ in 0..50 {
			let result = model.generate_with(3, 1, &mut rng);
			assert!(result.graceful);
			assert_eq!(result.tries, 1);
			assert_eq!(result.words, 3);
			assert!(result.text.starts_with("the cat"));
			assert!(result.text.ends_with("sat") || result.text.ends_with("ran"));
		}
	}

	#[test]
	fn reachable_endings_are_always_graceful() {
		// both prefixes start and end a line
		let mut model = GuidedNGramModel::new(2);
		model.train(["a b a", "b a b"]);
		let mut rng = rng();
		for length in 1..8 {
			let result = model.generate_with(length, 1, &mut rng);
			assert!(result.graceful, "length {length}: {result:?}");
		}
	}

	#[test]
	fn dead_end_keeps_partial_output() {
		// "c" is never followed by anything and never ends a line with n = 3.
		let mut model = GuidedNGramModel::new(3);
		model.train(["a b c"]);
		let result = model.attempt_with(10, &mut rng());
		assert!(!result.graceful);
		assert_eq!(result.text, "a b c");
		assert_eq!(result.tries, 1);
	}

	#[test]
	fn exhausted_retries_keep_the_longest_attempt() {
		let mut model = GuidedNGramModel::new(3);
		model.train(["a b c", "a b c d"]);
		let result = model.generate_with(20, 5, &mut rng());
		// the only ending ("b c") is passed long before 20 words
		assert!(!result.graceful);
		assert_eq!(result.tries, 5);
		assert_eq!(result.text, "a b c d");
	}

	#[test]
	fn tries_report_the_graceful_attempt() {
		let mut model = GuidedNGramModel::new(2);
		model.train(["hello world"]);
		model.train(["hello there friend"]);
		let result = model.generate_with(1, 0, &mut rng());
		assert!(result.graceful);
		assert_eq!(result.tries, 1);
		assert_eq!(result.text, "hello there friend");
	}

	#[test]
	fn guidance_filters_toward_endings() {
		let mut model = GuidedNGramModel::new(2);
		model.train(["s a end", "s a far away from here now"]);
		// from "a": "end" is never a prefix, "far" is 4 n-grams from the end
		let candidates = model.successors("a").unwrap_or_default();
		assert_eq!(model.guide_towards_end("a", candidates), vec!["end", "far"]);

		model.train(["q far z"]);
		// "far" now at distance 1 <= distance("a") == 1
		let candidates = model.successors("a").unwrap_or_default().to_vec();
		assert_eq!(model.guide_towards_end("a", &candidates), vec!["far"]);
	}

	#[test]
	fn guidance_without_distance_is_a_no_op() {
		let model = GuidedNGramModel::new(3);
		let candidates = vec!["x".to_owned(), "y".to_owned()];
		assert_eq!(model.guide_towards_end("p q", &candidates), vec!["x", "y"]);
	}

	#[test]
	fn cycle_without_ending_stops_at_word_limit() {
		// two single n-gram lines: x -> y -> x ... and no line ever ends
		let mut model = GuidedNGramModel::new(2).with_word_limit(64);
		model.train(["x y", "y x"]);
		let result = model.generate_with(5, 3, &mut rng());
		assert!(!result.graceful);
		assert_eq!(result.words, 5 + 64);
		assert_eq!(result.tries, 3);
	}

	#[test]
	fn target_longer_than_word_limit_still_ends_gracefully() {
		let mut model = GuidedNGramModel::new(2).with_word_limit(10);
		model.train(["a b a", "b a b"]);
		let mut rng = rng();
		for length in [50, DEFAULT_WORD_LIMIT + 100] {
			let result = model.generate_with(length, 1, &mut rng);
			assert!(result.graceful, "length {length}: {} words", result.words);
			assert_eq!(result.words, length);
		}

		let mut model = GuidedNGramModel::new(2);
		model.train(["a b a", "b a b"]);
		let result = model.generate_with(DEFAULT_WORD_LIMIT + 100, 1, &mut rng);
		assert!(result.graceful);
	}

	#[test]
	fn word_limit_is_clamped_to_order() {
		let model = GuidedNGramModel::new(4).with_word_limit(1);
		assert_eq!(model.word_limit(), 4);
	}

	#[test]
	fn merge_accumulates_tables() {
		let mut a = GuidedNGramModel::new(2);
		a.train(["a b c d"]);
		let mut b = GuidedNGramModel::new(2);
		b.train(["z b e"]);

		a.merge(&b).unwrap();
		assert_eq!(a.start_count(), 2);
		assert_eq!(a.distance("b"), Some(1));
		assert_eq!(a.successors("b").map(<[String]>::len), Some(2));
		assert_eq!(a.endings("b"), Some(&["e".to_owned()][..]));
	}

	#[test]
	fn merge_rejects_other_orders() {
		let mut a = GuidedNGramModel::new(2);
		let b = GuidedNGramModel::new(3);
		assert_eq!(a.merge(&b), Err(ModelError::OrderMismatch { expected: 2, found: 3 }));
	}
}
