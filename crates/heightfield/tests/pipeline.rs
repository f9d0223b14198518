//! End-to-end checks of the generation pipeline through the public API.
//!
//! Run: cargo test -p heightfield --test pipeline

use bevy::math::Vec3;

use heightfield::config::{HeightSynthesis, NoiseConfig, NormalAccumulation, TerrainConfig};
use heightfield::{CoherentNoise, RandomSource, TerrainEngine};

// ---------------------------------------------------------------------------
// Stub sources
// ---------------------------------------------------------------------------

/// Always `+1` signs and zero gaussian draws.
struct FlatRandom;

impl RandomSource for FlatRandom {
    fn next_uniform(&mut self) -> f64 {
        0.0
    }
    fn next_sign(&mut self) -> f32 {
        1.0
    }
    fn next_gaussian(&mut self, _mean: f64, _sigma: f64) -> f64 {
        0.0
    }
}

struct SilentNoise;

impl CoherentNoise for SilentNoise {
    fn sample(&self, _x: f64, _y: f64, _z: f64) -> f64 {
        0.0
    }
}

fn config(size: usize, seed: u64) -> TerrainConfig {
    TerrainConfig {
        size,
        seed,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Determinism and shape
// ---------------------------------------------------------------------------

#[test]
fn test_default_terrain_is_deterministic() {
    let a = TerrainEngine::from_config(TerrainConfig::default()).expect("valid");
    let b = TerrainEngine::from_config(TerrainConfig::default()).expect("valid");

    assert_eq!(a.size(), 129);
    assert_eq!(a.grid(), b.grid());
    assert_eq!(a.checksum(), b.checksum());
}

#[test]
fn test_supported_sizes_generate_finite_grids() {
    for size in [5, 9, 17, 129] {
        let engine = TerrainEngine::from_config(config(size, 99)).expect("valid size");
        assert_eq!(engine.size(), size);
        assert_eq!(engine.grid().cells().len(), size * size);
        for cell in engine.grid().cells() {
            assert!(cell.position.is_finite(), "size {size}: {:?}", cell.position);
            assert!(cell.normal.is_finite(), "size {size}: {:?}", cell.normal);
        }
    }
}

#[test]
fn test_rejected_sizes() {
    let overflowing = (1_usize << (usize::BITS - 1)) + 1;
    for size in [0, 1, 2, 4, 100, 128, 8193, overflowing] {
        assert!(
            TerrainEngine::from_config(config(size, 1)).is_err(),
            "size {size} should be rejected"
        );
    }
}

#[test]
fn test_every_cell_displaced_once() {
    let engine = TerrainEngine::from_config(config(33, 5)).expect("valid");
    let stats = engine.stats().displacement.expect("midpoint displacement ran");
    assert_eq!(stats.computed, 33 * 33);
    assert!(stats.reused > 0);
}

// ---------------------------------------------------------------------------
// Pinned scenario: N = 5, seed 42, noise disabled
// ---------------------------------------------------------------------------

fn pinned_small_terrain() -> TerrainEngine {
    TerrainEngine::from_config(TerrainConfig {
        size: 5,
        seed: 42,
        roughness: 0.5,
        max_height: 10.0,
        noise: NoiseConfig::disabled(),
        ..Default::default()
    })
    .expect("valid")
}

#[test]
fn test_small_terrain_heights_are_pinned() {
    let engine = pinned_small_terrain();

    // Bit patterns of the f32 heights produced by ChaCha8 seed 42 through the
    // documented draw order. Any change to the RNG, Box-Muller, the sign
    // draw or the recursion formulas shows up here.
    let pinned = [
        ((0, 0), 0x411d_ac87_u32), // tl ~ 9.854621
        ((0, 4), 0x411c_35f9),     // tr ~ 9.763177
        ((4, 0), 0x4123_5669),     // bl ~ 10.208596
        ((4, 4), 0x411b_f3df),     // br ~ 9.747039
        ((2, 2), 0x3cd4_b400),     // center ~ 0.025965
        ((2, 0), 0x40ce_6dab),     // left midpoint ~ 6.450887
    ];
    for ((i, j), bits) in pinned {
        let y = engine.cell(i, j).position.y;
        assert_eq!(
            y.to_bits(),
            bits,
            "({i}, {j}): got {y}, expected {}",
            f32::from_bits(bits)
        );
    }

    assert_eq!(engine.cell(0, 0).position.x, -2.0);
    assert_eq!(engine.cell(4, 4).position.z, 2.0);
}

#[test]
fn test_small_terrain_checksum_is_pinned() {
    let engine = pinned_small_terrain();
    assert_eq!(engine.stats().degenerate_faces, 0);
    assert_eq!(engine.checksum(), 0xde05_20d0);
}

// ---------------------------------------------------------------------------
// Geometry invariants
// ---------------------------------------------------------------------------

#[test]
fn test_center_is_recentered_without_horizontal_warp() {
    for size in [5, 17, 129] {
        let mut cfg = config(size, 11);
        cfg.noise.warp_horizontal = false;
        let engine = TerrainEngine::from_config(cfg).expect("valid");

        let mid = (size - 1) / 2;
        let center = engine.cell(mid, mid).position;
        assert_eq!(center.x, 0.0, "size {size}");
        assert_eq!(center.z, 0.0, "size {size}");
    }
}

#[test]
fn test_horizontal_warp_moves_lattice() {
    let mut plain = config(17, 4);
    plain.noise.warp_horizontal = false;
    let warped = config(17, 4);

    let a = TerrainEngine::from_config(plain).expect("valid");
    let b = TerrainEngine::from_config(warped).expect("valid");

    // Heights agree; the warp only touches x and z.
    for ((i, j), cell) in a.grid().iter() {
        assert_eq!(cell.position.y, b.cell(i, j).position.y);
    }
    assert!(a
        .grid()
        .iter()
        .any(|((i, j), cell)| cell.position.x != b.cell(i, j).position.x));
}

#[test]
fn test_flat_plane_regression() {
    let engine = TerrainEngine::with_sources(
        TerrainConfig {
            size: 17,
            ..Default::default()
        },
        &mut FlatRandom,
        &SilentNoise,
    )
    .expect("valid");

    assert_eq!(engine.stats().degenerate_faces, 0);
    for ((i, j), cell) in engine.grid().iter() {
        assert_eq!(cell.position.y, 0.0, "({i}, {j})");
        assert_eq!(cell.normal, Vec3::Y, "({i}, {j})");
        assert_eq!(cell.position.x, i as f32 - 8.0);
        assert_eq!(cell.position.z, j as f32 - 8.0);
    }
}

#[test]
fn test_smoothing_leaves_border_bit_identical() {
    let raw = TerrainEngine::from_config(config(33, 21)).expect("valid");
    let mut smoothed_cfg = config(33, 21);
    smoothed_cfg.smoothing_passes = 5;
    let smoothed = TerrainEngine::from_config(smoothed_cfg).expect("valid");

    let last = 32;
    let mut interior_changed = false;
    for ((i, j), cell) in raw.grid().iter() {
        let other = smoothed.cell(i, j).position.y;
        if i == 0 || j == 0 || i == last || j == last {
            assert_eq!(cell.position.y.to_bits(), other.to_bits(), "({i}, {j})");
        } else if cell.position.y != other {
            interior_changed = true;
        }
    }
    assert!(interior_changed);
}

#[test]
fn test_normals_mostly_face_up() {
    let engine = TerrainEngine::from_config(TerrainConfig::default()).expect("valid");
    let upward = engine
        .grid()
        .cells()
        .iter()
        .filter(|c| c.normal.y > 0.0)
        .count();
    let total = engine.grid().cells().len();
    assert!(upward * 10 > total * 9, "{upward} of {total} normals face up");
}

#[test]
fn test_accumulation_policies_differ_on_rough_terrain() {
    let pairwise = TerrainEngine::from_config(config(17, 8)).expect("valid");
    let mean = TerrainEngine::from_config(TerrainConfig {
        normal_accumulation: NormalAccumulation::Mean,
        ..config(17, 8)
    })
    .expect("valid");

    // Positions are shared; only normals differ.
    for ((i, j), cell) in pairwise.grid().iter() {
        assert_eq!(cell.position, mean.cell(i, j).position);
    }
    assert_ne!(pairwise.checksum(), mean.checksum());
}

// ---------------------------------------------------------------------------
// Particle deposition
// ---------------------------------------------------------------------------

#[test]
fn test_particle_deposition_pipeline() {
    let cfg = TerrainConfig {
        synthesis: HeightSynthesis::particle_deposition(),
        noise: NoiseConfig::disabled(),
        ..config(33, 77)
    };
    let a = TerrainEngine::from_config(cfg.clone()).expect("valid");
    let b = TerrainEngine::from_config(cfg).expect("valid");

    assert_eq!(a.checksum(), b.checksum());
    let deposition = a.stats().deposition.expect("deposition ran");
    assert_eq!(deposition.steps, 1000);
    assert!(a.grid().cells().iter().any(|c| c.position.y != 0.0));
}

#[test]
fn test_bounds_enclose_every_cell() {
    let engine = TerrainEngine::from_config(config(17, 3)).expect("valid");
    let (min, max) = engine.bounds();
    for cell in engine.grid().cells() {
        assert!(cell.position.cmpge(min).all());
        assert!(cell.position.cmple(max).all());
    }
}
