// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root cells: grid addressing, envelopes computed from grid position, root-to-root adjacency.

use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::direction::Direction;
use crate::grid::Grid;
use crate::types::{CellEnvelope, CellId, RootPos};

impl<A> Grid<A> {
    /// Root at `pos`, or `None` if `pos` is outside the grid.
    pub fn root(&self, pos: RootPos) -> Option<CellId> {
        (pos.row < self.layout.rows && pos.col < self.layout.cols)
            .then(|| self.roots[self.layout.index(pos)])
    }

    /// Position of the root containing `pt`, or `None` outside the grid.
    pub fn root_at(&self, pt: Point) -> Option<RootPos> {
        self.layout.root_pos_at(pt)
    }

    /// Root at `pos` with its rectangle.
    pub fn root_envelope(&self, pos: RootPos) -> Option<CellEnvelope> {
        let root = self.root(pos)?;
        Some(CellEnvelope::new(self.layout.root_rect(pos), root))
    }

    /// Root adjacent to `pos` in `dir`, or `None` at the grid edge.
    pub fn neighbor_root(&self, pos: RootPos, dir: Direction) -> Option<CellEnvelope> {
        self.root(pos)?;
        self.root_envelope(self.layout.neighbor(pos, dir)?)
    }

    /// Root adjacent to the root `id` in `dir`.
    ///
    /// `None` at the grid edge or if `id` is not a root.
    pub fn find_neighbor_root(&self, id: CellId, dir: Direction) -> Option<CellEnvelope> {
        self.neighbor_root(self.root_pos_of(id)?, dir)
    }

    /// All roots with their rectangles, in row-major order from the south-west.
    pub fn roots(&self) -> impl Iterator<Item = CellEnvelope> + '_ {
        self.roots.iter().enumerate().map(|(i, root)| {
            CellEnvelope::new(self.layout.root_rect(self.layout.pos(i)), *root)
        })
    }

    /// Outer corners of the root grid as a closed counter-clockwise ring.
    ///
    /// Starts and ends at the south-west corner and visits every root corner on the
    /// boundary, `2 * (rows + cols) + 1` points in total.
    pub fn boundary_points(&self) -> Vec<Point> {
        let Rect { x0, y0, .. } = self.layout.bounds();
        let s = self.layout.cell_size;
        let (rows, cols) = (self.layout.rows, self.layout.cols);
        let at = |col: usize, row: usize| Point::new(x0 + col as f64 * s, y0 + row as f64 * s);
        let mut out = Vec::with_capacity(2 * (rows + cols) + 1);
        out.extend((0..=cols).map(|c| at(c, 0)));
        out.extend((1..=rows).map(|r| at(cols, r)));
        out.extend((0..cols).rev().map(|c| at(c, rows)));
        out.extend((0..rows).rev().map(|r| at(0, r)));
        out
    }
}
