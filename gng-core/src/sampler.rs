//! Uniform selection of distinct indices (partial Durstenfeld shuffle).
//!
//! Three strategies share one contract and differ only in cost:
//! - [`DenseSampler`]: fresh index array, `O(population)`
//! - [`BufferedSampler`]: same algorithm on a reused buffer
//! - [`SparseSampler`]: records only swapped slots, `O(count)`
//!
//! [`Strategy::for_sizes`] picks one from the sizes alone and
//! [`SamplerScratch`] owns the reusable buffers of one caller.

use std::collections::HashMap;

use log::trace;
use rand::Rng;

/// Populations up to this size always use [`DenseSampler`].
pub const DENSE_LIMIT: usize = 512;

/// Selects `count` distinct indices in `[0, population)`.
///
/// Every implementation must give each `count`-subset the same probability.
/// `count` is clamped to `population`; a `count` of 0 yields nothing.
pub trait IndexSampler {
	fn select<R: Rng + ?Sized>(&mut self, rng: &mut R, population: usize, count: usize) -> Vec<usize>;
}

/// Shuffles the first `count` slots of `pool` in place and returns them.
fn draw<R: Rng + ?Sized>(rng: &mut R, pool: &mut [usize], count: usize) -> Vec<usize> {
	let mut selected = Vec::with_capacity(count);
	for i in 0..count {
		let j = rng.random_range(i..pool.len());
		selected.push(pool[j]);
		pool[j] = pool[i];
	}
	selected
}

/// Allocates a full index array on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenseSampler;

impl IndexSampler for DenseSampler {
	fn select<R: Rng + ?Sized>(&mut self, rng: &mut R, population: usize, count: usize) -> Vec<usize> {
		let count = count.min(population);
		if count == 0 {
			return Vec::new();
		}
		let mut pool: Vec<usize> = (0..population).collect();
		draw(rng, &mut pool, count)
	}
}

/// Dense algorithm over a buffer kept between calls.
///
/// The buffer is owned scratch: one instance per caller, never shared.
#[derive(Debug, Default, Clone)]
pub struct BufferedSampler {
	pool: Vec<usize>,
}

impl IndexSampler for BufferedSampler {
	fn select<R: Rng + ?Sized>(&mut self, rng: &mut R, population: usize, count: usize) -> Vec<usize> {
		let count = count.min(population);
		if count == 0 {
			return Vec::new();
		}
		self.pool.clear();
		self.pool.extend(0..population);
		draw(rng, &mut self.pool, count)
	}
}

/// Partial shuffle over a virtual index array.
///
/// Slots that were never swapped hold their own index, so only the
/// swapped ones are stored.
#[derive(Debug, Default, Clone)]
pub struct SparseSampler {
	swapped: HashMap<usize, usize>,
}

impl IndexSampler for SparseSampler {
	fn select<R: Rng + ?Sized>(&mut self, rng: &mut R, population: usize, count: usize) -> Vec<usize> {
		let count = count.min(population);
		if count == 0 {
			return Vec::new();
		}
		self.swapped.clear();

		let mut selected = Vec::with_capacity(count);
		for i in 0..count {
			let j = rng.random_range(i..population);
			let head = *self.swapped.get(&i).unwrap_or(&i);
			selected.push(*self.swapped.get(&j).unwrap_or(&j));
			self.swapped.insert(j, head);
		}
		selected
	}
}

/// Which sampler to use for a given request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	Dense,
	Buffered,
	Sparse,
}

impl Strategy {
	/// Picks the cheapest strategy for `count` out of `population`.
	///
	/// - Small populations: allocation dominates, use [`Strategy::Dense`].
	/// - Few selections out of many: [`Strategy::Sparse`].
	/// - Otherwise: [`Strategy::Buffered`].
	pub fn for_sizes(population: usize, count: usize) -> Self {
		let count = count.min(population);
		if population <= DENSE_LIMIT {
			Strategy::Dense
		} else if count < population >> 3 {
			Strategy::Sparse
		} else {
			Strategy::Buffered
		}
	}
}

/// Reusable sampling buffers of one caller.
///
/// Concurrent callers must each own a `SamplerScratch`; the buffers are
/// mutated without synchronization.
#[derive(Debug, Default, Clone)]
pub struct SamplerScratch {
	buffered: BufferedSampler,
	sparse: SparseSampler,
}

impl SamplerScratch {
	pub fn new() -> Self {
		Self::default()
	}

	/// Selects with the strategy chosen by [`Strategy::for_sizes`].
	pub fn select<R: Rng + ?Sized>(&mut self, rng: &mut R, population: usize, count: usize) -> Vec<usize> {
		let strategy = Strategy::for_sizes(population, count);
		trace!("sampling {count} of {population} with {strategy:?}");
		match strategy {
			Strategy::Dense => DenseSampler.select(rng, population, count),
			Strategy::Buffered => self.buffered.select(rng, population, count),
			Strategy::Sparse => self.sparse.select(rng, population, count),
		}
	}
}

/// One-shot selection with fresh scratch and the thread-local generator.
pub fn auto_select(population: usize, count: usize) -> Vec<usize> {
	SamplerScratch::new().select(&mut rand::rng(), population, count)
}
