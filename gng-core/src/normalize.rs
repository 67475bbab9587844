/// Punctuation stripped from every line, removing it links more n-grams together.
pub const PUNCTUATION: [char; 5] = [';', ',', '.', '?', '!'];

/// Characters that can go without changing the meaning of a line.
pub const UNNECESSARY: [char; 6] = ['[', ']', ':', '(', ')', '\u{2014}'];

/// Normalizes a raw line before n-gram extraction.
///
/// - Trims surrounding whitespace
/// - Lowercases (Unicode aware)
/// - Removes [`PUNCTUATION`] and [`UNNECESSARY`] characters
pub fn normalize(line: &str) -> String {
	line.trim()
		.to_lowercase()
		.chars()
		.filter(|c| !PUNCTUATION.contains(c) && !UNNECESSARY.contains(c))
		.collect()
}
