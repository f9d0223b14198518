pub mod config;
pub mod deposition;
pub mod engine;
pub mod error;
pub mod grid;
pub mod midpoint;
pub mod noise_overlay;
pub mod normals;
pub mod origin;
pub mod plugin;
pub mod rng;
pub mod smoothing;

pub use config::{HeightSynthesis, NoiseConfig, NormalAccumulation, TerrainConfig};
pub use engine::{GenerationStats, TerrainEngine};
pub use error::TerrainError;
pub use grid::{Cell, HeightfieldGrid};
pub use noise_overlay::{CoherentNoise, PerlinNoise};
pub use plugin::HeightfieldPlugin;
pub use rng::{RandomSource, SeededRng};
