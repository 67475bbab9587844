/// Everything the model knows about a single prefix.
///
/// A `PrefixState` is one row shared by the transition, end and distance
/// tables: all three are keyed by the same prefix, so they live together.
///
/// ## Responsibilities:
/// - Accumulate observed successors (duplicates kept, frequency is repetition)
/// - Accumulate suffixes observed on the last n-gram of a line
/// - Track the minimum distance to the end of a line
/// - Merge with another state of the same prefix
///
/// ## Invariants
/// - `successors` is never empty once the state has been observed
/// - `distance` only ever decreases
#[derive(Clone, Debug)]
pub(crate) struct PrefixState {
	/// Observed continuations, in training order.
	successors: Vec<String>,
	/// `Some` once the prefix has been seen on the last n-gram of a line.
	/// An empty list still means the prefix ends a line.
	endings: Option<Vec<String>>,
	/// Minimum number of n-grams (inclusive) left to the end of a line.
	distance: usize,
}

impl Default for PrefixState {
	fn default() -> Self {
		Self {
			successors: Vec::new(),
			endings: None,
			distance: usize::MAX,
		}
	}
}

impl PrefixState {
	pub fn add_successor(&mut self, word: &str) {
		self.successors.push(word.to_owned());
	}

	pub fn add_ending(&mut self, word: &str) {
		self.endings.get_or_insert_with(Vec::new).push(word.to_owned());
	}

	/// Keeps the smaller of the known distance and `distance`.
	pub fn observe_distance(&mut self, distance: usize) {
		self.distance = self.distance.min(distance);
	}

	pub fn successors(&self) -> &[String] {
		&self.successors
	}

	pub fn endings(&self) -> Option<&[String]> {
		self.endings.as_deref()
	}

	/// `None` until at least one occurrence was recorded.
	pub fn distance(&self) -> Option<usize> {
		(self.distance != usize::MAX).then_some(self.distance)
	}

	/// Merges another state for the same prefix into this one.
	///
	/// Lists are appended, the distance keeps the minimum.
	pub fn merge(&mut self, other: &Self) {
		self.successors.extend(other.successors.iter().cloned());
		if let Some(endings) = &other.endings {
			self.endings
				.get_or_insert_with(Vec::new)
				.extend(endings.iter().cloned());
		}
		self.distance = self.distance.min(other.distance);
	}
}
