use bevy::math::Vec3;

use crate::grid::{box_mean3x3, HeightfieldGrid};

/// Second pass: replace each interior normal with the mean of its 3x3
/// neighbourhood, read from a snapshot taken before any write.
pub fn smooth_vertex_normals(grid: &mut HeightfieldGrid) {
    let size = grid.size();
    if size < 3 {
        return;
    }

    let snapshot: Vec<Vec3> = grid.cells().iter().map(|c| c.normal).collect();
    for i in 1..size - 1 {
        for j in 1..size - 1 {
            grid.get_mut(i, j).normal = box_mean3x3(&snapshot, size, i, j);
        }
    }
}
