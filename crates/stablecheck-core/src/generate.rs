//! Random preference generation.
//!
//! Every ranking is a freshly allocated `0..n` shuffled with
//! [`SliceRandom::shuffle`] (Fisher–Yates), so rankings are independent and
//! uniformly distributed over all `n!` permutations.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::instance::Instance;
use crate::types::Ranking;
use crate::violation::GenerationError;

/// Generate `n` independent uniformly random rankings over `0..n`.
#[must_use]
pub fn generate_rankings<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<Ranking> {
    (0..n)
        .map(|_| {
            let mut order: Vec<usize> = (0..n).collect();
            order.shuffle(rng);
            Ranking::new(order)
        })
        .collect()
}

impl Instance {
    /// Generate a random `n`-by-`n` instance: left rankings first, then right.
    ///
    /// # Errors
    /// Returns a [`GenerationError`] if a generated ranking fails its
    /// permutation invariant, which indicates a bug in the generator.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Result<Self, GenerationError> {
        let left = generate_rankings(rng, n);
        let right = generate_rankings(rng, n);
        Self::new(left, right)
    }
}
