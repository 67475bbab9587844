/// Separator used to join prefix words into a table key.
///
/// Every table of the model is keyed with this format, so it must never change
/// between training and generation.
pub const KEY_SEPARATOR: &str = " ";

/// A window of `n` consecutive words borrowed from a line.
///
/// The first `n - 1` words form the prefix (the lookup key of the model),
/// the last word is the suffix (the observed continuation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NGram<'a> {
	words: Vec<&'a str>,
}

impl<'a> NGram<'a> {
	/// All the words of the window, in order.
	pub fn words(&self) -> &[&'a str] {
		&self.words
	}

	/// The first `n - 1` words.
	pub fn prefix(&self) -> &[&'a str] {
		&self.words[..self.words.len() - 1]
	}

	/// The last word.
	pub fn suffix(&self) -> &'a str {
		self.words[self.words.len() - 1]
	}

	/// The prefix joined with [`KEY_SEPARATOR`].
	pub fn prefix_key(&self) -> String {
		join_key(self.prefix())
	}
}

/// Joins words into a table key.
pub fn join_key<S: AsRef<str>>(words: &[S]) -> String {
	let mut key = String::new();
	for (i, word) in words.iter().enumerate() {
		if i > 0 {
			key.push_str(KEY_SEPARATOR);
		}
		key.push_str(word.as_ref());
	}
	key
}

/// Splits a line into its ordered sliding windows of `n` words.
///
/// # Behavior
/// - Words are separated by runs of whitespace.
/// - A line with fewer than `n` words yields no n-gram.
/// - Order and duplicate windows are preserved.
/// - `n` below 2 is treated as 2, an n-gram needs a prefix and a suffix.
pub fn extract(line: &str, n: usize) -> Vec<NGram<'_>> {
	let n = n.max(2);
	let words: Vec<&str> = line.split_whitespace().collect();
	if words.len() < n {
		return Vec::new();
	}

	words
		.windows(n)
		.map(|window| NGram { words: window.to_vec() })
		.collect()
}
