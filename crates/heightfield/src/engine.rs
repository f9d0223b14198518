// =============================================================================
// TerrainEngine: runs the generation pipeline and owns the finished grid.
// =============================================================================

use bevy::log::info;
use bevy::math::{Vec3, Vec4};
use bevy::prelude::Resource;
use xxhash_rust::xxh32::xxh32;

use crate::config::{HeightSynthesis, NoiseConfig, TerrainConfig};
use crate::deposition::{deposit_particles, DepositionStats};
use crate::error::TerrainError;
use crate::grid::{Cell, HeightfieldGrid};
use crate::midpoint::{DisplacementStats, MidpointDisplacement};
use crate::noise_overlay::{apply_noise_overlay, noise_seed, CoherentNoise, PerlinNoise};
use crate::normals::estimate_normals;
use crate::origin::translate_to_origin;
use crate::rng::{RandomSource, SeededRng};
use crate::smoothing::smooth_heights;

const CHECKSUM_SEED: u32 = 0;

/// What the pipeline did while building a terrain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    /// Set when midpoint displacement synthesised the heights.
    pub displacement: Option<DisplacementStats>,
    /// Set when particle deposition synthesised the heights.
    pub deposition: Option<DepositionStats>,
    /// Zero-area triangles left out of the vertex normals.
    pub degenerate_faces: usize,
}

/// A fully generated heightfield.
///
/// Generation runs to completion inside the constructor, in fixed order:
/// height synthesis, noise overlay, origin translation, optional smoothing,
/// normal estimation. Afterwards the grid is read-only.
#[derive(Resource, Debug, Clone)]
pub struct TerrainEngine {
    config: TerrainConfig,
    grid: HeightfieldGrid,
    stats: GenerationStats,
}

impl TerrainEngine {
    /// Build a terrain from the default configuration with the given
    /// overrides.
    pub fn new(
        seed: u64,
        size: usize,
        roughness: f32,
        max_height: f32,
        noise_exponent: f64,
        horizontal_noise_scale: f64,
        smoothing_passes: u32,
    ) -> Result<Self, TerrainError> {
        let defaults = TerrainConfig::default();
        Self::from_config(TerrainConfig {
            seed,
            size,
            roughness,
            max_height,
            noise: NoiseConfig {
                exponent: noise_exponent,
                horizontal_scale: horizontal_noise_scale,
                ..defaults.noise
            },
            smoothing_passes,
            ..defaults
        })
    }

    /// Build a terrain using `SeededRng` and `PerlinNoise`, both seeded from
    /// `config.seed`. The noise seed folds all 64 bits into 32.
    pub fn from_config(config: TerrainConfig) -> Result<Self, TerrainError> {
        let mut rng = SeededRng::from_seed_u64(config.seed);
        let noise = PerlinNoise::with_seed(noise_seed(config.seed));
        Self::with_sources(config, &mut rng, &noise)
    }

    /// Build a terrain from explicit random and noise sources.
    pub fn with_sources<R, N>(
        config: TerrainConfig,
        rng: &mut R,
        noise: &N,
    ) -> Result<Self, TerrainError>
    where
        R: RandomSource + ?Sized,
        N: CoherentNoise + ?Sized,
    {
        config.validate()?;

        let mut grid = HeightfieldGrid::new(config.size, Vec4::from_array(config.base_color));
        let mut stats = GenerationStats::default();

        match config.synthesis {
            HeightSynthesis::MidpointDisplacement => {
                let displacement =
                    MidpointDisplacement::new(&mut grid, rng, config.roughness, config.edge_scale);
                stats.displacement = Some(displacement.run(config.max_height));
            }
            HeightSynthesis::ParticleDeposition { particles } => {
                stats.deposition = Some(deposit_particles(
                    &mut grid,
                    rng,
                    particles,
                    config.max_height,
                ));
            }
        }

        apply_noise_overlay(&mut grid, noise, &config.noise);
        translate_to_origin(&mut grid);
        smooth_heights(&mut grid, config.smoothing_passes);
        stats.degenerate_faces = estimate_normals(&mut grid, config.normal_accumulation);

        let engine = Self {
            config,
            grid,
            stats,
        };

        let (min, max) = engine.bounds();
        info!(
            "Generated {}x{} heightfield: seed {}, heights {:.3}..{:.3}, checksum {:08x}",
            engine.size(),
            engine.size(),
            engine.config.seed,
            min.y,
            max.y,
            engine.checksum(),
        );
        Ok(engine)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.grid.size()
    }

    /// Copy of cell `(i, j)`. Panics when either index is `>= size()`.
    #[inline]
    pub fn cell(&self, i: usize, j: usize) -> Cell {
        *self.grid.get(i, j)
    }

    pub fn try_cell(&self, i: usize, j: usize) -> Option<Cell> {
        self.grid.try_get(i, j).copied()
    }

    pub fn grid(&self) -> &HeightfieldGrid {
        &self.grid
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.config
    }

    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    /// Min and max corners of the terrain's bounding box.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.grid.bounds()
    }

    /// Height of the first cell (row-major) whose position truncates to the
    /// same integer `(x, z)` as the query. `None` off the terrain.
    pub fn height_at(&self, x: f32, z: f32) -> Option<f32> {
        let (qx, qz) = (x as i32, z as i32);
        self.grid
            .cells()
            .iter()
            .find(|c| c.position.x as i32 == qx && c.position.z as i32 == qz)
            .map(|c| c.position.y)
    }

    /// xxh32 over the little-endian bytes of every cell (position, normal,
    /// color). Equal checksums mean byte-identical grids in practice.
    pub fn checksum(&self) -> u32 {
        let mut bytes = Vec::with_capacity(self.grid.cells().len() * 10 * 4);
        for cell in self.grid.cells() {
            let floats = cell
                .position
                .to_array()
                .into_iter()
                .chain(cell.normal.to_array())
                .chain(cell.color.to_array());
            for v in floats {
                bytes.extend_from_slice(&v.to_le_bytes());
            }
        }
        xxh32(&bytes, CHECKSUM_SEED)
    }
}
