//! Optional 3x3 box filter over heights.
//!
//! Double-buffered: each pass reads a snapshot taken before the pass and
//! writes the live grid, so the result does not depend on visiting order.
//! Border cells are never written.

use bevy::log::debug;

use crate::grid::{box_mean3x3, HeightfieldGrid};

pub fn smooth_heights(grid: &mut HeightfieldGrid, passes: u32) {
    let size = grid.size();
    if passes == 0 || size < 3 {
        return;
    }

    for _ in 0..passes {
        let snapshot: Vec<f32> = grid.cells().iter().map(|c| c.position.y).collect();
        for i in 1..size - 1 {
            for j in 1..size - 1 {
                grid.set_height(i, j, box_mean3x3(&snapshot, size, i, j));
            }
        }
    }
    debug!("smoothed heights with {passes} pass(es)");
}
