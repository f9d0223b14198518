use bevy::math::Vec3;

use crate::config::NormalAccumulation;
use crate::grid::HeightfieldGrid;

/// Unit normal of triangle `(v1, v2, v3)` from `(v2 - v1) x (v3 - v2)`.
/// `None` for zero-area or non-finite triangles.
pub fn face_normal(v1: Vec3, v2: Vec3, v3: Vec3) -> Option<Vec3> {
    let edge1 = v2 - v1;
    let edge2 = v3 - v2;
    edge1.cross(edge2).try_normalize()
}

/// Folds face normals into per-vertex normals.
pub struct NormalAccumulator {
    policy: NormalAccumulation,
    normals: Vec<Vec3>,
    counts: Vec<u32>,
}

impl NormalAccumulator {
    pub fn new(vertices: usize, policy: NormalAccumulation) -> Self {
        Self {
            policy,
            normals: vec![Vec3::ZERO; vertices],
            counts: vec![0; vertices],
        }
    }

    /// Fold `face` into `vertex`. Under `PairwiseAverage` an all-zero normal
    /// counts as unset, including one whose earlier faces cancelled out.
    pub fn add(&mut self, vertex: usize, face: Vec3) {
        let current = self.normals[vertex];
        self.normals[vertex] = match self.policy {
            NormalAccumulation::PairwiseAverage if current == Vec3::ZERO => face,
            NormalAccumulation::PairwiseAverage => (current + face) / 2.0,
            NormalAccumulation::Mean => current + face,
        };
        self.counts[vertex] += 1;
    }

    /// Final per-vertex normals. Vertices that received no face stay zero.
    pub fn finish(self) -> Vec<Vec3> {
        match self.policy {
            NormalAccumulation::PairwiseAverage => self.normals,
            NormalAccumulation::Mean => self
                .normals
                .into_iter()
                .zip(self.counts)
                .map(|(sum, count)| if count > 1 { sum / count as f32 } else { sum })
                .collect(),
        }
    }
}

/// First pass: face normals for every quad, row-major `i` then `j`, folded
/// into the vertex normals of `grid`. Returns the number of skipped
/// degenerate triangles.
///
/// Quad `(i, j)` is split into triangles `(i,j) (i,j+1) (i+1,j)` and
/// `(i+1,j+1) (i+1,j) (i,j+1)`, wound so a flat lattice faces `+Y`.
pub fn accumulate_face_normals(grid: &mut HeightfieldGrid, policy: NormalAccumulation) -> usize {
    let size = grid.size();
    let mut acc = NormalAccumulator::new(size * size, policy);
    let mut degenerate = 0;

    for i in 0..size.saturating_sub(1) {
        for j in 0..size - 1 {
            let triangles = [
                [(i, j), (i, j + 1), (i + 1, j)],
                [(i + 1, j + 1), (i + 1, j), (i, j + 1)],
            ];
            for tri in triangles {
                let [a, b, c] = tri.map(|(ti, tj)| grid.get(ti, tj).position);
                match face_normal(a, b, c) {
                    Some(n) => {
                        for (vi, vj) in tri {
                            acc.add(grid.index(vi, vj), n);
                        }
                    }
                    None => degenerate += 1,
                }
            }
        }
    }

    for (cell, normal) in grid.cells_mut().iter_mut().zip(acc.finish()) {
        cell.normal = normal;
    }
    degenerate
}
