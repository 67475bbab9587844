//! Combination of several line corpora under relative weights.

use log::{debug, warn};
use rand::Rng;

use crate::sampler::SamplerScratch;

/// Weight applied to corpora listed after the last given weight.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Largest weight honored; larger ones are lowered to it.
pub const MAX_WEIGHT: f64 = 1024.0;

/// Combines corpora into one sequence using the thread-local generator.
///
/// See [`combine_with`].
pub fn combine(corpora: &[Vec<String>], weights: &[f64]) -> Vec<String> {
	combine_with(corpora, weights, &mut SamplerScratch::new(), &mut rand::rng())
}

/// Combines corpora into one sequence, resizing each one by its weight.
///
/// # Parameters
/// - `corpora`: line sequences, in order.
/// - `weights`: relative weights, same order as `corpora`. Missing weights
///   default to [`DEFAULT_WEIGHT`], extra weights are ignored.
/// - `scratch`: sampling buffers owned by the caller.
///
/// # Behavior
/// - No weight, or a single corpus: non-empty corpora are concatenated as-is.
/// - Otherwise each corpus is resized to `round(weight * max)` lines, where
///   `max` is the length of the largest corpus:
///   - a weight of exactly 1.0 on a corpus of `max` lines keeps it whole
///   - otherwise as many full copies as fit, then the remainder drawn
///     without replacement in sampler order
/// - Empty corpora contribute nothing; output keeps the input order.
/// - Non-finite weights drop their corpus, weights above [`MAX_WEIGHT`]
///   are lowered to it.
pub fn combine_with<R: Rng + ?Sized>(
	corpora: &[Vec<String>],
	weights: &[f64],
	scratch: &mut SamplerScratch,
	rng: &mut R,
) -> Vec<String> {
	let mut combined = Vec::new();

	if weights.is_empty() || corpora.len() == 1 {
		for corpus in corpora {
			combined.extend(corpus.iter().cloned());
		}
		return combined;
	}

	let max = corpora.iter().map(Vec::len).max().unwrap_or(0);

	for (i, corpus) in corpora.iter().enumerate() {
		if corpus.is_empty() {
			continue;
		}
		let weight = checked_weight(i, weights.get(i).copied().unwrap_or(DEFAULT_WEIGHT));

		if weight == 1.0 && corpus.len() == max {
			combined.extend(corpus.iter().cloned());
			continue;
		}

		let target = target_len(weight, max);
		let copies = target / corpus.len();
		for _ in 0..copies {
			combined.extend(corpus.iter().cloned());
		}
		for index in scratch.select(rng, corpus.len(), target % corpus.len()) {
			combined.push(corpus[index].clone());
		}
		debug!("corpus {i}: {} lines weighted {weight} -> {target} lines", corpus.len());
	}

	combined
}

fn checked_weight(corpus: usize, weight: f64) -> f64 {
	if !weight.is_finite() {
		warn!("corpus {corpus}: weight {weight} is not finite, corpus dropped");
		0.0
	} else if weight > MAX_WEIGHT {
		warn!("corpus {corpus}: weight {weight} lowered to {MAX_WEIGHT}");
		MAX_WEIGHT
	} else {
		weight
	}
}

/// `round(weight * max)`, half up.
fn target_len(weight: f64, max: usize) -> usize {
	// saturating cast: negative and NaN targets become 0
	(weight * max as f64 + 0.5).floor() as usize
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::collections::HashSet;

	fn corpus(prefix: &str, len: usize) -> Vec<String> {
		(0..len).map(|i| format!("{prefix} {i}")).collect()
	}

	fn run(corpora: &[Vec<String>], weights: &[f64]) -> Vec<String> {
		combine_with(corpora, weights, &mut SamplerScratch::new(), &mut StdRng::seed_from_u64(11))
	}

	#[test]
	fn single_corpus_is_unchanged() {
		let lines = corpus("a", 5);
		assert_eq!(run(&[lines.clone()], &[1.0]), lines);
		assert_eq!(run(&[lines.clone()], &[0.2]), lines);
	}

	#[test]
	fn no_weights_concatenates() {
		let a = corpus("a", 3);
		let b = corpus("b", 2);
		let combined = run(&[a.clone(), Vec::new(), b.clone()], &[]);
		assert_eq!(combined, [a, b].concat());
	}

	#[test]
	fn smaller_corpus_is_scaled_up() {
		let a = corpus("a", 10);
		let b = corpus("b", 4);
		let combined = run(&[a.clone(), b.clone()], &[1.0, 1.0]);

		assert_eq!(combined.len(), 20);
		assert_eq!(&combined[..10], &a[..]);
		assert_eq!(&combined[10..14], &b[..]);
		assert_eq!(&combined[14..18], &b[..]);

		let extra: HashSet<&String> = combined[18..].iter().collect();
		assert_eq!(extra.len(), 2);
		assert!(extra.iter().all(|line| b.contains(line)));
	}

	#[test]
	fn missing_weights_default_to_one() {
		let a = corpus("a", 10);
		let b = corpus("b", 4);
		assert_eq!(run(&[a, b], &[0.5]).len(), 5 + 10);
	}

	#[test]
	fn fractional_weight_samples_distinct_lines() {
		let a = corpus("a", 10);
		let b = corpus("b", 8);
		let combined = run(&[a, b.clone()], &[1.0, 0.25]);
		// round(0.25 * 10) = 3 (half up), no full copy of b
		assert_eq!(combined.len(), 13);
		let sampled: HashSet<&String> = combined[10..].iter().collect();
		assert_eq!(sampled.len(), 3);
		assert!(sampled.iter().all(|line| b.contains(line)));
	}

	#[test]
	fn zero_and_negative_weights_drop_a_corpus() {
		let a = corpus("a", 6);
		let b = corpus("b", 6);
		assert_eq!(run(&[a.clone(), b.clone()], &[1.0, 0.0]), a);
		assert_eq!(run(&[a.clone(), b], &[1.0, -2.0]), a);
	}

	#[test]
	fn largest_corpus_can_be_scaled_too() {
		let a = corpus("a", 4);
		let b = corpus("b", 2);
		let combined = run(&[a.clone(), b], &[2.0, 1.0]);
		assert_eq!(&combined[..8], &[a.clone(), a].concat()[..]);
		assert_eq!(combined.len(), 8 + 4);
	}

	#[test]
	fn extreme_weights_are_bounded() {
		let a = corpus("a", 3);
		let b = corpus("b", 2);
		assert_eq!(run(&[a.clone(), b.clone()], &[1.0, f64::INFINITY]), a);
		assert_eq!(run(&[a.clone(), b.clone()], &[1.0, f64::NEG_INFINITY]), a);
		assert_eq!(run(&[a.clone(), b.clone()], &[1.0, 1e300]).len(), 3 + 3 * 1024);
		assert_eq!(checked_weight(0, 2.5), 2.5);
		assert_eq!(checked_weight(0, f64::NAN), 0.0);
	}

	#[test]
	fn rounding_is_half_up() {
		assert_eq!(target_len(0.25, 10), 3);
		assert_eq!(target_len(0.24, 10), 2);
		assert_eq!(target_len(1.5, 3), 5);
		assert_eq!(target_len(f64::NAN, 3), 0);
		assert_eq!(target_len(-1.0, 3), 0);
	}
}
