//! Particle deposition: an alternative to midpoint displacement.
//!
//! A particle walks the lattice one cardinal step at a time. Each step blends
//! a fresh gaussian draw with the previous particle height and stamps the
//! result into the current cell, then halves the draw range. Walking off the
//! grid respawns the particle at a random cell with the range reset.

use bevy::log::debug;

use crate::config::{DEPOSITION_RANGE_DIVISOR, GAUSSIAN_SIGMA_DIVISOR};
use crate::grid::HeightfieldGrid;
use crate::rng::RandomSource;

/// Counters reported by a finished deposition run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DepositionStats {
    pub steps: u32,
    /// Times the particle left the grid and was placed again.
    pub respawns: u32,
}

pub fn deposit_particles<R: RandomSource + ?Sized>(
    grid: &mut HeightfieldGrid,
    rng: &mut R,
    particles: u32,
    max_height: f32,
) -> DepositionStats {
    let size = grid.size();
    let max_range = f64::from(max_height / DEPOSITION_RANGE_DIVISOR);
    let mut range = max_range;
    let mut stats = DepositionStats::default();

    let mut x = rng.next_index(size) as isize;
    let mut z = rng.next_index(size) as isize;
    let mut y = 0.0_f32;

    for _ in 0..particles {
        let sign = rng.next_sign();
        let draw = rng.next_gaussian(range, range / GAUSSIAN_SIGMA_DIVISOR) as f32;
        y = (sign * draw + y) / 2.0;
        grid.set_height(x as usize, z as usize, y);
        stats.steps += 1;

        match rng.next_index(4) {
            0 => x += 1,
            1 => x -= 1,
            2 => z += 1,
            _ => z -= 1,
        }
        range /= 2.0;

        let limit = size as isize;
        if x < 0 || z < 0 || x >= limit || z >= limit {
            x = rng.next_index(size) as isize;
            z = rng.next_index(size) as isize;
            range = max_range;
            stats.respawns += 1;
        }
    }

    debug!(
        "particle deposition: {} steps, {} respawns",
        stats.steps, stats.respawns
    );
    stats
}
