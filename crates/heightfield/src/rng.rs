//! Seeded randomness for terrain synthesis.
//!
//! Every generation stage takes `&mut impl RandomSource` explicitly instead of
//! reaching for a shared generator, so one seed drives one reproducible
//! sequence and tests can swap in scripted sources.

use std::f64::consts::PI;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Source of the random draws consumed by height synthesis.
///
/// Only `next_uniform` is required. The derived draws are defined in terms of
/// it, and stubs may override them directly.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_uniform(&mut self) -> f64;

    /// `+1.0` or `-1.0` with equal probability.
    fn next_sign(&mut self) -> f32 {
        if self.next_uniform() < 0.5 {
            1.0
        } else {
            -1.0
        }
    }

    /// Normal sample via the Box-Muller transform over two uniforms.
    fn next_gaussian(&mut self, mean: f64, sigma: f64) -> f64 {
        // 1 - [0, 1) lies in (0, 1], keeping ln() finite.
        let u1 = 1.0 - self.next_uniform();
        let u2 = self.next_uniform();
        let std_normal = (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).sin();
        mean + sigma * std_normal
    }

    /// Uniform index in `0..upper`. `upper` must be non-zero.
    fn next_index(&mut self, upper: usize) -> usize {
        ((self.next_uniform() * upper as f64) as usize).min(upper - 1)
    }
}

/// Deterministic terrain RNG.
///
/// Wraps `ChaCha8Rng` so identical seeds give identical sequences on every
/// platform.
#[derive(Debug, Clone)]
pub struct SeededRng(pub ChaCha8Rng);

impl SeededRng {
    /// Create a new `SeededRng` seeded from the given `u64` value.
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRng {
    fn next_uniform(&mut self) -> f64 {
        self.0.gen::<f64>()
    }

    fn next_sign(&mut self) -> f32 {
        if self.0.gen_range(0..2) == 0 {
            1.0
        } else {
            -1.0
        }
    }

    fn next_index(&mut self, upper: usize) -> usize {
        self.0.gen_range(0..upper)
    }
}
