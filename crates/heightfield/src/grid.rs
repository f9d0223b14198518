use std::ops::{Add, Div};

use bevy::math::{Vec3, Vec4};

/// One heightfield sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub position: Vec3,
    pub normal: Vec3,
    pub color: Vec4,
}

impl Cell {
    /// Unset cell at lattice point `(i, 0, j)` with a zero normal.
    pub fn at_lattice(i: usize, j: usize, color: Vec4) -> Self {
        Self {
            position: Vec3::new(i as f32, 0.0, j as f32),
            normal: Vec3::ZERO,
            color,
        }
    }
}

/// Square `N x N` grid of cells stored row-major: `i` selects the row (the
/// x axis) and `j` the column (the z axis).
///
/// Every accessor is bounds-checked. Indexing outside the grid is a bug in
/// the caller and panics instead of touching a neighbouring row.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightfieldGrid {
    cells: Vec<Cell>,
    size: usize,
}

impl HeightfieldGrid {
    pub fn new(size: usize, color: Vec4) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for i in 0..size {
            for j in 0..size {
                cells.push(Cell::at_lattice(i, j, color));
            }
        }
        Self { cells, size }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, i: usize, j: usize) -> bool {
        i < self.size && j < self.size
    }

    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            self.in_bounds(i, j),
            "heightfield index ({i}, {j}) out of range for a {n}x{n} grid",
            n = self.size
        );
        i * self.size + j
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> &Cell {
        &self.cells[self.index(i, j)]
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize, j: usize) -> &mut Cell {
        let idx = self.index(i, j);
        &mut self.cells[idx]
    }

    pub fn try_get(&self, i: usize, j: usize) -> Option<&Cell> {
        if self.in_bounds(i, j) {
            Some(&self.cells[i * self.size + j])
        } else {
            None
        }
    }

    #[inline]
    pub fn height(&self, i: usize, j: usize) -> f32 {
        self.get(i, j).position.y
    }

    #[inline]
    pub fn set_height(&mut self, i: usize, j: usize, y: f32) {
        self.get_mut(i, j).position.y = y;
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Row-major iterator over `((i, j), cell)`.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| ((idx / size, idx % size), cell))
    }

    /// Min and max corners of the axis-aligned box around every position.
    pub fn bounds(&self) -> (Vec3, Vec3) {
        self.cells.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(min, max), cell| (min.min(cell.position), max.max(cell.position)),
        )
    }
}

/// Mean of the 3x3 neighbourhood around interior cell `(i, j)` of a row-major
/// `size x size` snapshot. Summation runs `j - 1..=j + 1` outer,
/// `i - 1..=i + 1` inner.
pub(crate) fn box_mean3x3<T>(snapshot: &[T], size: usize, i: usize, j: usize) -> T
where
    T: Copy + Add<Output = T> + Div<f32, Output = T>,
{
    debug_assert!(i >= 1 && j >= 1 && i + 1 < size && j + 1 < size);
    let at = |i: usize, j: usize| snapshot[i * size + j];
    let mut sum = at(i - 1, j - 1);
    for (di, dj) in [
        (1, 0),
        (2, 0),
        (0, 1),
        (1, 1),
        (2, 1),
        (0, 2),
        (1, 2),
        (2, 2),
    ] {
        sum = sum + at(i - 1 + di, j - 1 + dj);
    }
    sum / 9.0
}
