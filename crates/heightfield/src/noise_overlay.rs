//! Multi-octave coherent noise applied on top of the synthesised heights.
//!
//! Each cell samples noise at `(i, j, y)`, using its own displaced height as
//! the third coordinate. The octave sum is sharpened by `exponent` and added
//! to `y`, and with `warp_horizontal` also to `x` and `z`.

use bevy::log::debug;
use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::config::NoiseConfig;
use crate::grid::HeightfieldGrid;

/// Coherent 3D noise sampled by the overlay.
pub trait CoherentNoise {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64;
}

/// Perlin noise backed by `FastNoiseLite`, at frequency 1 so lattice
/// coordinates are passed through unscaled.
pub struct PerlinNoise {
    noise: FastNoiseLite,
}

impl PerlinNoise {
    pub fn with_seed(seed: i32) -> Self {
        let mut noise = FastNoiseLite::with_seed(seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));
        Self { noise }
    }
}

/// Fold a 64-bit terrain seed into the 32-bit seed `FastNoiseLite` takes, so
/// seeds that differ only in their upper half still get distinct noise.
pub fn noise_seed(seed: u64) -> i32 {
    (seed ^ (seed >> 32)) as i32
}

impl CoherentNoise for PerlinNoise {
    fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        f64::from(self.noise.get_noise_3d(x as f32, y as f32, z as f32))
    }
}

/// Sum of `config.octaves` octaves at `(x, y, z)`, scaled by `config.amplitude`.
pub fn octave_sum<N: CoherentNoise + ?Sized>(
    noise: &N,
    x: f64,
    y: f64,
    z: f64,
    config: &NoiseConfig,
) -> f64 {
    let mut amplitude = 1.0;
    let mut frequency = 1.0;
    let mut e = 0.0;
    for _ in 0..config.octaves {
        e += amplitude * noise.sample(frequency * x, frequency * y, frequency * z);
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }
    e * config.amplitude
}

/// Raise the octave sum to `exponent`. Integral exponents keep the sign rules
/// of ordinary powers; fractional ones act on `|e|` so negative sums never
/// produce NaN.
pub fn sharpen(e: f64, exponent: f64) -> f64 {
    if exponent.fract() == 0.0 && exponent <= f64::from(i32::MAX) {
        e.powi(exponent as i32)
    } else {
        e.abs().powf(exponent)
    }
}

/// Perturb every cell in row-major order. A disabled config leaves the grid
/// untouched.
pub fn apply_noise_overlay<N: CoherentNoise + ?Sized>(
    grid: &mut HeightfieldGrid,
    noise: &N,
    config: &NoiseConfig,
) {
    if !config.is_enabled() {
        debug!("noise overlay disabled");
        return;
    }

    let size = grid.size();
    for (idx, cell) in grid.cells_mut().iter_mut().enumerate() {
        let i = (idx / size) as f64 * config.horizontal_scale;
        let j = (idx % size) as f64 * config.horizontal_scale;
        let y = f64::from(cell.position.y);

        let h = sharpen(octave_sum(noise, i, j, y, config), config.exponent) as f32;

        cell.position.y += h;
        if config.warp_horizontal {
            cell.position.x += h;
            cell.position.z += h;
        }
    }
    debug!("noise overlay applied to {} cells", size * size);
}
