// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public handle and result types: cell identifiers, root positions, envelopes, neighbours.

use kurbo::Rect;

/// Identifier for a cell in a [`Grid`](crate::Grid).
///
/// Cells are never removed, so an identifier stays valid for the lifetime of the grid
/// that issued it. Identifiers from one grid mean nothing to another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellId(pub(crate) u32);

impl CellId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "CellId uses 32-bit indices by design."
    )]
    pub(crate) const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Grid address of a root cell. Row 0 is the southern-most row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RootPos {
    /// Row, counted northwards from the origin.
    pub row: usize,
    /// Column, counted eastwards from the origin.
    pub col: usize,
}

impl RootPos {
    /// Create a root position.
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A cell together with its rectangle.
///
/// Cells carry no geometry, so every query returns envelopes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellEnvelope {
    /// The cell's rectangle.
    pub rect: Rect,
    /// The cell.
    pub cell: CellId,
}

impl CellEnvelope {
    /// Pair a rectangle with a cell.
    pub const fn new(rect: Rect, cell: CellId) -> Self {
        Self { rect, cell }
    }
}

/// Result of a neighbour search.
///
/// `level` is relative to the level the search was started with: it equals the
/// requested level when the neighbour is as fine as the query cell and is smaller
/// by one for every level the neighbour is coarser.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellNeighbour {
    /// The neighbouring cell.
    pub cell: CellId,
    /// Refinement level of `cell`, relative to the search's reference.
    pub level: i32,
    /// Rectangle of `cell`.
    pub rect: Rect,
}

impl CellNeighbour {
    /// Drop the level and keep the envelope.
    pub const fn envelope(&self) -> CellEnvelope {
        CellEnvelope::new(self.rect, self.cell)
    }
}
