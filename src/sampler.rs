//! Random sampling for the zero-match fallback.
//!
//! Retrieval asks a [`FallbackSampler`] for a sample whenever no item scores
//! above zero. The default sampler shuffles with the thread-local RNG; tests
//! and reproducible runs can use [`SeededSampler`].

use crate::types::CatalogItem;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Draws up to `max` items from a pool of eligible items.
///
/// Implementations must only return items taken from `pool`.
pub trait FallbackSampler: Send + Sync {
  fn sample<'a>(&self, pool: Vec<&'a CatalogItem>, max: usize) -> Vec<&'a CatalogItem>;
}

/// Uniform shuffle using `rand::rng()`. Needs no shared state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSampler;

impl FallbackSampler for ThreadRngSampler {
  fn sample<'a>(&self, pool: Vec<&'a CatalogItem>, max: usize) -> Vec<&'a CatalogItem> {
    shuffle_take(pool, max, &mut rand::rng())
  }
}

/// Uniform shuffle driven by a seeded [`StdRng`].
///
/// Successive calls advance the same generator, so a sampler built from a
/// given seed yields the same sequence of samples on every run.
#[derive(Debug)]
pub struct SeededSampler {
  rng: Mutex<StdRng>,
}

impl SeededSampler {
  pub fn new(seed: u64) -> Self {
    Self {
      rng: Mutex::new(StdRng::seed_from_u64(seed)),
    }
  }
}

impl FallbackSampler for SeededSampler {
  fn sample<'a>(&self, pool: Vec<&'a CatalogItem>, max: usize) -> Vec<&'a CatalogItem> {
    let mut rng = self.rng.lock();
    shuffle_take(pool, max, &mut *rng)
  }
}

fn shuffle_take<'a, R: Rng + ?Sized>(
  mut pool: Vec<&'a CatalogItem>,
  max: usize,
  rng: &mut R,
) -> Vec<&'a CatalogItem> {
  pool.shuffle(rng);
  pool.truncate(max);
  pool
}
