//! Recursive midpoint displacement (diamond-square style).
//!
//! The four outer corners get gaussian heights around `max_height`. Each
//! recursion step displaces the center of its square and the four edge
//! midpoints, shrinks the height range by `2^-roughness`, and recurses into
//! the four quadrants until they are a single grid step wide.
//!
//! Neighbouring quadrants share their boundary edges. The first quadrant to
//! reach a shared midpoint writes it; every later visit reads it back. A
//! per-cell written mask tracks this, so a legitimately zero height is never
//! mistaken for an unset one.

use bevy::log::debug;

use crate::config::GAUSSIAN_SIGMA_DIVISOR;
use crate::grid::HeightfieldGrid;
use crate::rng::RandomSource;

/// Counters reported by a finished displacement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisplacementStats {
    /// Cells whose height was drawn (each exactly once).
    pub computed: usize,
    /// Midpoint visits that reused a height written by an earlier quadrant.
    pub reused: usize,
}

#[derive(Debug, Clone, Copy)]
struct ControlPoint {
    i: usize,
    j: usize,
    y: f32,
}

pub struct MidpointDisplacement<'a, R: RandomSource + ?Sized> {
    grid: &'a mut HeightfieldGrid,
    rng: &'a mut R,
    written: Vec<bool>,
    range_decay: f64,
    edge_scale: f32,
    stats: DisplacementStats,
}

impl<'a, R: RandomSource + ?Sized> MidpointDisplacement<'a, R> {
    pub fn new(
        grid: &'a mut HeightfieldGrid,
        rng: &'a mut R,
        roughness: f32,
        edge_scale: f32,
    ) -> Self {
        let cells = grid.size() * grid.size();
        Self {
            grid,
            rng,
            written: vec![false; cells],
            range_decay: 2f64.powf(-f64::from(roughness)),
            edge_scale,
            stats: DisplacementStats::default(),
        }
    }

    /// Displace the whole grid, starting from a height range of `max_height`.
    pub fn run(mut self, max_height: f32) -> DisplacementStats {
        let last = self.grid.size() - 1;
        let range = f64::from(max_height);

        let tl = self.corner(0, 0, range);
        let tr = self.corner(0, last, range);
        let bl = self.corner(last, 0, range);
        let br = self.corner(last, last, range);

        self.subdivide(tl, tr, bl, br, range);

        debug!(
            "midpoint displacement: {} cells computed, {} shared midpoints reused",
            self.stats.computed, self.stats.reused
        );
        self.stats
    }

    fn corner(&mut self, i: usize, j: usize, range: f64) -> ControlPoint {
        let y = self.draw(range) as f32;
        self.commit(ControlPoint { i, j, y })
    }

    fn subdivide(
        &mut self,
        tl: ControlPoint,
        tr: ControlPoint,
        bl: ControlPoint,
        br: ControlPoint,
        range: f64,
    ) {
        let sign = self.rng.next_sign();
        let offset = self.draw(range) as f32;
        let ctr = self.commit(ControlPoint {
            i: (tl.i + tr.i + bl.i + br.i) / 4,
            j: (tl.j + tr.j + bl.j + br.j) / 4,
            y: sign * offset + (tl.y + tr.y + bl.y + br.y) / 4.0,
        });

        let lm = self.edge(tl, bl, ctr, range);
        let rm = self.edge(tr, br, ctr, range);
        let tm = self.edge(tl, tr, ctr, range);
        let bm = self.edge(bl, br, ctr, range);

        let next_range = range * self.range_decay;

        if tm.j - tl.j > 1 {
            self.subdivide(tl, tm, lm, ctr, next_range);
            self.subdivide(tm, tr, ctr, rm, next_range);
            self.subdivide(lm, ctr, bl, bm, next_range);
            self.subdivide(ctr, rm, bm, br, next_range);
        }
    }

    /// Midpoint between `a` and `b`. Reuses the stored height if another
    /// quadrant already wrote this cell.
    fn edge(
        &mut self,
        a: ControlPoint,
        b: ControlPoint,
        ctr: ControlPoint,
        range: f64,
    ) -> ControlPoint {
        let i = (a.i + b.i) / 2;
        let j = (a.j + b.j) / 2;
        let idx = self.grid.index(i, j);

        if self.written[idx] {
            self.stats.reused += 1;
            return ControlPoint {
                i,
                j,
                y: self.grid.height(i, j),
            };
        }

        let sign = self.rng.next_sign();
        let offset = self.draw(range) as f32;
        self.commit(ControlPoint {
            i,
            j,
            y: sign * offset * self.edge_scale + (a.y + b.y + ctr.y) / 3.0,
        })
    }

    fn draw(&mut self, range: f64) -> f64 {
        self.rng.next_gaussian(range, range / GAUSSIAN_SIGMA_DIVISOR)
    }

    fn commit(&mut self, point: ControlPoint) -> ControlPoint {
        let idx = self.grid.index(point.i, point.j);
        assert!(
            !self.written[idx],
            "midpoint ({}, {}) written twice",
            point.i, point.j
        );
        self.written[idx] = true;
        self.grid.set_height(point.i, point.j, point.y);
        self.stats.computed += 1;
        point
    }
}
