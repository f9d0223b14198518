//! Per-vertex shading normals.
//!
//! Two passes over the finished positions:
//! 1. `face`: two triangle normals per grid quad, folded into the normals of
//!    the triangles' vertices according to `NormalAccumulation`.
//! 2. `vertex`: 3x3 box filter over the interior vertex normals, read from a
//!    snapshot. Border normals keep their face-derived values.
//!
//! Normals are not renormalised after the box filter. Consumers that need
//! unit normals renormalise them at the rendering boundary.

mod face;
mod vertex;

pub use face::{accumulate_face_normals, face_normal, NormalAccumulator};
pub use vertex::smooth_vertex_normals;

use bevy::log::warn;

use crate::config::NormalAccumulation;
use crate::grid::HeightfieldGrid;

/// Run both normal passes over `grid`. Returns the number of degenerate
/// (zero-area) triangles that were skipped.
pub fn estimate_normals(grid: &mut HeightfieldGrid, policy: NormalAccumulation) -> usize {
    let degenerate = accumulate_face_normals(grid, policy);
    if degenerate > 0 {
        warn!("skipped {degenerate} degenerate terrain triangle(s) while estimating normals");
    }
    smooth_vertex_normals(grid);
    degenerate
}
