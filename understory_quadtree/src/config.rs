// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction parameters and the normalized root layout derived from them.

use kurbo::{Point, Rect};

use crate::direction::Direction;
use crate::geometry::{ceil_to_i64, floor_to_i64};
use crate::types::RootPos;

/// Parameters for building a [`Grid`](crate::Grid).
///
/// Nothing here is validated; [`GridConfig::layout`] normalizes whatever it is given.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridConfig {
    /// Area the grid must cover. It is padded symmetrically to a whole number of roots.
    pub bounds: Rect,
    /// Edge length of a root cell. `None`, non-positive, or NaN means a single root
    /// spanning the longer side of `bounds`.
    pub cell_size: Option<f64>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            bounds: Rect::new(0.0, 0.0, 1.0, 1.0),
            cell_size: None,
        }
    }
}

impl GridConfig {
    /// Configuration covering `bounds` with a single root.
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            cell_size: None,
        }
    }

    /// Set the root edge length.
    pub fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = Some(cell_size);
        self
    }

    /// Root edge length after normalization.
    pub fn effective_cell_size(&self) -> f64 {
        let b = self.bounds.abs();
        match self.cell_size {
            Some(s) if s > 0.0 && s.is_finite() => s,
            _ => {
                let extent = b.width().max(b.height());
                if extent > 0.0 { extent } else { 1.0 }
            }
        }
    }

    /// Compute root counts and the padded origin.
    pub fn layout(&self) -> GridLayout {
        let b = self.bounds.abs();
        let cell_size = self.effective_cell_size();
        let cols = ceil_to_i64(b.width() / cell_size).max(1);
        let rows = ceil_to_i64(b.height() / cell_size).max(1);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "Root counts are bounded by memory long before usize."
        )]
        let (rows, cols) = (rows as usize, cols as usize);
        let pad_x = 0.5 * (cols as f64 * cell_size - b.width());
        let pad_y = 0.5 * (rows as f64 * cell_size - b.height());
        GridLayout {
            origin: Point::new(b.x0 - pad_x, b.y0 - pad_y),
            cell_size,
            rows,
            cols,
        }
    }
}

/// Normalized arrangement of roots: `rows × cols` squares of `cell_size` from `origin`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridLayout {
    /// South-west corner of the padded bounds.
    pub origin: Point,
    /// Root edge length.
    pub cell_size: f64,
    /// Number of root rows (along `y`).
    pub rows: usize,
    /// Number of root columns (along `x`).
    pub cols: usize,
}

impl GridLayout {
    /// Padded bounds, an exact multiple of `cell_size` on both axes.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + self.cols as f64 * self.cell_size,
            self.origin.y + self.rows as f64 * self.cell_size,
        )
    }

    /// Number of roots, saturating on absurd layouts.
    pub fn len(&self) -> usize {
        self.rows.saturating_mul(self.cols)
    }

    /// Always false; a layout has at least one root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major position of `pos` in the root array.
    pub fn index(&self, pos: RootPos) -> usize {
        debug_assert!(
            pos.row < self.rows && pos.col < self.cols,
            "root position out of range"
        );
        pos.row * self.cols + pos.col
    }

    /// Inverse of [`index`](Self::index).
    pub fn pos(&self, index: usize) -> RootPos {
        RootPos::new(index / self.cols, index % self.cols)
    }

    /// Rectangle of the root at `pos`.
    ///
    /// Each edge is computed from its own grid line, so neighbouring roots share
    /// bit-identical edges.
    pub fn root_rect(&self, pos: RootPos) -> Rect {
        let s = self.cell_size;
        let line = |origin: f64, i: usize| origin + i as f64 * s;
        Rect::new(
            line(self.origin.x, pos.col),
            line(self.origin.y, pos.row),
            line(self.origin.x, pos.col + 1),
            line(self.origin.y, pos.row + 1),
        )
    }

    /// Root containing `pt`, or `None` outside the (closed) bounds.
    ///
    /// Points on the east or north boundary belong to the last column or row.
    pub fn root_pos_at(&self, pt: Point) -> Option<RootPos> {
        let b = self.bounds();
        if !(pt.x >= b.x0 && pt.x <= b.x1 && pt.y >= b.y0 && pt.y <= b.y1) {
            return None;
        }
        Some(self.clamped_pos(pt))
    }

    /// Root nearest to `pt`, clamping each axis into range.
    pub fn clamped_pos(&self, pt: Point) -> RootPos {
        let s = self.cell_size;
        let col = floor_to_i64((pt.x - self.origin.x) / s);
        let row = floor_to_i64((pt.y - self.origin.y) / s);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_possible_wrap,
            reason = "Indices are clamped into the root range first."
        )]
        let clamp = |v: i64, n: usize| v.clamp(0, n as i64 - 1) as usize;
        let mut pos = RootPos::new(clamp(row, self.rows), clamp(col, self.cols));
        // Floor division can land one root off next to a grid line; settle on the root
        // whose rectangle actually holds the point.
        let r = self.root_rect(pos);
        if pt.x < r.x0 && pos.col > 0 {
            pos.col -= 1;
        } else if pt.x > r.x1 && pos.col + 1 < self.cols {
            pos.col += 1;
        }
        if pt.y < r.y0 && pos.row > 0 {
            pos.row -= 1;
        } else if pt.y > r.y1 && pos.row + 1 < self.rows {
            pos.row += 1;
        }
        pos
    }

    /// Root adjacent to `pos` in `dir`, or `None` at the grid edge.
    pub fn neighbor(&self, pos: RootPos, dir: Direction) -> Option<RootPos> {
        let (dx, dy) = dir.offset();
        let row = pos.row.checked_add_signed(isize::from(dy))?;
        let col = pos.col.checked_add_signed(isize::from(dx))?;
        (row < self.rows && col < self.cols).then_some(RootPos::new(row, col))
    }
}
