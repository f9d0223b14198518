use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::TerrainError;

pub const DEFAULT_TERRAIN_SIZE: usize = 129;

/// Largest accepted grid dimension (`2^12 + 1`, about 16.8M cells).
pub const MAX_TERRAIN_SIZE: usize = 4097;
pub const DEFAULT_SEED: u64 = 11_092_016;
pub const DEFAULT_ROUGHNESS: f32 = 0.85;
pub const DEFAULT_MAX_HEIGHT: f32 = 10.0;

/// Multiplier applied to the random part of edge midpoints. Centers are
/// displaced by the full gaussian draw, edges only by this fraction of it.
pub const EDGE_DISPLACEMENT_SCALE: f32 = 0.025;

/// Gaussian draws use `sigma = range / GAUSSIAN_SIGMA_DIVISOR`.
pub const GAUSSIAN_SIGMA_DIVISOR: f64 = 32.0;

pub const NOISE_OCTAVES: u32 = 4;
pub const NOISE_PERSISTENCE: f64 = 0.5;
pub const NOISE_LACUNARITY: f64 = 2.0;
pub const NOISE_EXPONENT: f64 = 4.0;

pub const DEFAULT_CELL_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
pub const DEFAULT_DEPOSITION_PARTICLES: u32 = 1000;

/// Particle deposition restarts each walk at `max_height / DEPOSITION_RANGE_DIVISOR`.
pub const DEPOSITION_RANGE_DIVISOR: f32 = 8.0;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which algorithm synthesises the base heights before the noise overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HeightSynthesis {
    #[default]
    MidpointDisplacement,
    /// Random-walk deposition with `particles` steps in total.
    ParticleDeposition { particles: u32 },
}

impl HeightSynthesis {
    /// Particle deposition with the default particle count.
    pub fn particle_deposition() -> Self {
        Self::ParticleDeposition {
            particles: DEFAULT_DEPOSITION_PARTICLES,
        }
    }
}

/// How face normals are folded into a shared vertex normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NormalAccumulation {
    /// `n = (n + face) / 2` whenever `n` is non-zero, `n = face` while it is
    /// all-zero. Later faces weigh more, so the result depends on row-major
    /// visiting order.
    #[default]
    PairwiseAverage,
    /// Arithmetic mean of every contributing face normal.
    Mean,
}

// ---------------------------------------------------------------------------
// Noise overlay configuration
// ---------------------------------------------------------------------------

/// Parameters for the multi-octave noise post-process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub octaves: u32,
    /// Amplitude decay between octaves.
    pub persistence: f64,
    /// Frequency growth between octaves.
    pub lacunarity: f64,
    /// Scales the octave sum. `0.0` disables the overlay entirely.
    pub amplitude: f64,
    /// Sharpening exponent applied to the octave sum.
    pub exponent: f64,
    /// Multiplier on the grid indices used as the first two noise coordinates.
    pub horizontal_scale: f64,
    /// Add the noise term to `x` and `z` as well as `y`.
    pub warp_horizontal: bool,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: NOISE_OCTAVES,
            persistence: NOISE_PERSISTENCE,
            lacunarity: NOISE_LACUNARITY,
            amplitude: 1.0,
            exponent: NOISE_EXPONENT,
            horizontal_scale: 1.0,
            warp_horizontal: true,
        }
    }
}

impl NoiseConfig {
    /// Default parameters with the overlay switched off.
    pub fn disabled() -> Self {
        Self {
            amplitude: 0.0,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.amplitude != 0.0 && self.octaves > 0
    }
}

// ---------------------------------------------------------------------------
// Terrain configuration resource
// ---------------------------------------------------------------------------

/// Everything needed to reproduce a heightfield. Two engines built from equal
/// configurations hold identical grids.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Grid dimension `N`, must be `2^k + 1`.
    pub size: usize,
    pub seed: u64,
    /// Range shrinks by `2^-roughness` per recursion level.
    pub roughness: f32,
    pub max_height: f32,
    pub edge_scale: f32,
    pub synthesis: HeightSynthesis,
    pub noise: NoiseConfig,
    /// Number of 3x3 height box-filter passes. Defaults to 0.
    pub smoothing_passes: u32,
    pub normal_accumulation: NormalAccumulation,
    pub base_color: [f32; 4],
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_TERRAIN_SIZE,
            seed: DEFAULT_SEED,
            roughness: DEFAULT_ROUGHNESS,
            max_height: DEFAULT_MAX_HEIGHT,
            edge_scale: EDGE_DISPLACEMENT_SCALE,
            synthesis: HeightSynthesis::default(),
            noise: NoiseConfig::default(),
            smoothing_passes: 0,
            normal_accumulation: NormalAccumulation::default(),
            base_color: DEFAULT_CELL_COLOR,
        }
    }
}

impl TerrainConfig {
    /// Check every parameter before any allocation happens.
    pub fn validate(&self) -> Result<(), TerrainError> {
        if !is_valid_size(self.size) {
            return Err(TerrainError::InvalidSize { size: self.size });
        }

        let params = [
            ("roughness", f64::from(self.roughness)),
            ("max_height", f64::from(self.max_height)),
            ("edge_scale", f64::from(self.edge_scale)),
            ("noise.persistence", self.noise.persistence),
            ("noise.lacunarity", self.noise.lacunarity),
            ("noise.amplitude", self.noise.amplitude),
            ("noise.exponent", self.noise.exponent),
            ("noise.horizontal_scale", self.noise.horizontal_scale),
        ];
        for (name, value) in params {
            if !value.is_finite() {
                return Err(TerrainError::InvalidParameter { name, value });
            }
        }

        if self.max_height < 0.0 {
            return Err(TerrainError::InvalidParameter {
                name: "max_height",
                value: f64::from(self.max_height),
            });
        }
        if self.noise.exponent < 0.0 {
            return Err(TerrainError::InvalidParameter {
                name: "noise.exponent",
                value: self.noise.exponent,
            });
        }
        if self.base_color.iter().any(|c| !c.is_finite()) {
            return Err(TerrainError::InvalidParameter {
                name: "base_color",
                value: f64::NAN,
            });
        }
        Ok(())
    }
}

/// `true` when `size == 2^k + 1` for some `k >= 1`, so recursive quartering
/// bottoms out on single-step quadrants, and `size <= MAX_TERRAIN_SIZE`.
pub fn is_valid_size(size: usize) -> bool {
    (3..=MAX_TERRAIN_SIZE).contains(&size) && (size - 1).is_power_of_two()
}
