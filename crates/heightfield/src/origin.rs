use crate::grid::HeightfieldGrid;

/// Shift every cell by `-(N - 1) / 2` on `x` and `z` so the middle lattice
/// point sits on the origin. `y` is untouched.
///
/// `N` is odd, so the offset is a whole number and the middle cell lands on
/// exactly `x = 0, z = 0` whenever the noise overlay did not warp it
/// horizontally.
pub fn translate_to_origin(grid: &mut HeightfieldGrid) {
    let offset = ((grid.size() - 1) / 2) as f32;
    for cell in grid.cells_mut() {
        cell.position.x -= offset;
        cell.position.z -= offset;
    }
}
