//! Deterministic RNG wrapper for seeded analysis steps.
//!
//! Two consumers need randomness: k-means++ seeding of customer-profile
//! clusters and the simulated demand grid.  Both must be reproducible from a
//! single `u64` seed, so every independent stream (one per k-means restart,
//! for example) is derived with:
//!
//!   seed = root_seed XOR (stream * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream numbers uniformly across the seed space.
//! Adding a stream never disturbs the seeds of existing ones.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Seeded `SmallRng` with a small convenience surface.
///
/// Used only in single-threaded contexts.  If a parallel consumer ever needs
/// randomness, give each worker its own stream via [`SeededRng::stream`].
pub struct SeededRng(SmallRng);

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng(SmallRng::seed_from_u64(seed))
    }

    /// Independent stream `stream` of the root `seed`.
    pub fn stream(seed: u64, stream: u64) -> Self {
        SeededRng::new(seed ^ stream.wrapping_mul(MIXING_CONSTANT))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// Pick an index with probability proportional to `weights[i]`.
    ///
    /// Returns `None` when the slice is empty or every weight is zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().sum();
        if !(total.is_finite() && total > 0.0) {
            return None;
        }
        let mut target = self.0.gen_range(0.0..total);
        for (i, &w) in weights.iter().enumerate() {
            if target < w {
                return Some(i);
            }
            target -= w;
        }
        // Rounding can leave `target` just past the last positive weight.
        weights.iter().rposition(|&w| w > 0.0)
    }
}
