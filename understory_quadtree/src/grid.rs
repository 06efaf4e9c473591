// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Grid`] container: cell arena, root array, bulk operations and query dispatch.

use alloc::boxed::Box;
use alloc::vec::Vec;
use kurbo::{Line, Point, Rect};

use crate::attribute::CellAttribute;
use crate::cell::{Cell, Link};
use crate::config::{GridConfig, GridLayout};
use crate::direction::Quadrant;
use crate::geometry::{intersects, quadrant_rect, segment_intersects};
use crate::types::{CellEnvelope, CellId, RootPos};

/// Relative slack applied to rectangles in line queries, scaled by the root cell size.
///
/// Segments running exactly along a cell edge would otherwise be lost to rounding.
pub const LINE_TOLERANCE: f64 = 1e-9;

type Factory<A> = Box<dyn FnMut(Rect) -> Option<A>>;

/// A rectangular grid of independent root quadtrees.
///
/// All cells live in one arena and are addressed by [`CellId`]. Cells never store
/// their rectangle; queries return [`CellEnvelope`]s with the geometry rebuilt on the
/// way down. The structure only grows: there is no merge.
///
/// `A` is the per-cell payload. A factory supplied at construction produces the
/// payload of every new leaf; see [`CellAttribute`] for how payloads divide.
pub struct Grid<A = ()> {
    pub(crate) layout: GridLayout,
    pub(crate) cells: Vec<Cell<A>>,
    pub(crate) roots: Vec<CellId>,
    factory: Factory<A>,
}

impl<A> core::fmt::Debug for Grid<A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Grid")
            .field("layout", &self.layout)
            .field("cells", &self.cells.len())
            .field("leaves", &self.leaf_count())
            .finish_non_exhaustive()
    }
}

impl<A: CellAttribute + Default + 'static> Grid<A> {
    /// Grid covering `bounds` with square roots of edge `cell_size`.
    ///
    /// Every leaf starts with `A::default()`. A non-positive or NaN `cell_size`
    /// gives a single root.
    pub fn new(bounds: Rect, cell_size: f64) -> Self {
        Self::with_factory(bounds, cell_size, |_| Some(A::default()))
    }
}

impl<A: CellAttribute> Grid<A> {
    /// Grid covering `bounds`, with `factory` producing the payload of each new leaf.
    pub fn with_factory(
        bounds: Rect,
        cell_size: f64,
        factory: impl FnMut(Rect) -> Option<A> + 'static,
    ) -> Self {
        Self::from_config(GridConfig::new(bounds).with_cell_size(cell_size), factory)
    }

    /// Grid built from a [`GridConfig`].
    pub fn from_config(config: GridConfig, factory: impl FnMut(Rect) -> Option<A> + 'static) -> Self {
        let layout = config.layout();
        let mut factory: Factory<A> = Box::new(factory);
        let mut cells = Vec::with_capacity(layout.len());
        let mut roots = Vec::with_capacity(layout.len());
        for i in 0..layout.len() {
            let pos = layout.pos(i);
            roots.push(CellId::new(cells.len()));
            cells.push(Cell::root(pos, factory(layout.root_rect(pos))));
        }
        Self {
            layout,
            cells,
            roots,
            factory,
        }
    }

    /// Split the leaf `id` covering `envelope` into four children.
    ///
    /// The factory runs for each child before the parent's payload is handed to
    /// [`CellAttribute::divide`]. Returns the children in [`Quadrant`] order, or `None`
    /// if `id` is not a leaf of this grid.
    pub fn divide(&mut self, id: CellId, envelope: Rect) -> Option<[CellId; 4]> {
        if !self.cells.get(id.idx())?.is_leaf() {
            return None;
        }
        let base = self.cells.len();
        debug_assert!(
            u32::try_from(base + 3).is_ok(),
            "cell arena outgrew 32-bit CellId indices"
        );
        let children = Quadrant::ALL.map(|q| CellId::new(base + q.index()));
        let factory = &mut self.factory;
        let mut attributes = Quadrant::ALL.map(|q| factory(quadrant_rect(envelope, q)));
        if let Some(attribute) = self.cell_mut(id).attribute.take() {
            attribute.divide(envelope, &mut attributes);
        }
        for attribute in attributes {
            self.cells.push(Cell::child(id, attribute));
        }
        self.cell_mut(id).children = Some(children);
        Some(children)
    }

    /// Divide the leaf containing `pt` once.
    ///
    /// Returns the new children, or `None` if `pt` is outside the grid.
    pub fn divide_cell(&mut self, pt: Point) -> Option<[CellId; 4]> {
        let leaf = self.find_cell(pt)?;
        self.divide(leaf.cell, leaf.rect)
    }

    /// Divide the leaf containing `pt` until it is no larger than `max_size`.
    ///
    /// Returns the leaf containing `pt` afterwards, or `None` outside the grid.
    /// A non-positive or NaN `max_size` divides nothing.
    pub fn refine_at(&mut self, pt: Point, max_size: f64) -> Option<CellEnvelope> {
        let mut leaf = self.find_cell(pt)?;
        if max_size.is_nan() || max_size <= 0.0 {
            return Some(leaf);
        }
        while leaf.rect.width() > max_size || leaf.rect.height() > max_size {
            self.divide(leaf.cell, leaf.rect)?;
            leaf = self.locate(leaf.cell, leaf.rect, pt);
        }
        Some(leaf)
    }

    /// Divide until no leaf is wider or taller than `max_size`.
    ///
    /// Returns the number of divisions. A non-positive or NaN `max_size` is a no-op.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "Grid::divide_to_size")
    )]
    pub fn divide_to_size(&mut self, max_size: f64) -> usize {
        let mut divisions = 0;
        if max_size.is_nan() || max_size <= 0.0 {
            return divisions;
        }
        for i in 0..self.roots.len() {
            let rect = self.layout.root_rect(self.layout.pos(i));
            self.divide_subtree_to_size(self.roots[i], rect, max_size, &mut divisions);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(max_size, divisions, cells = self.cells.len(), "divided to size");
        divisions
    }

    /// One balancing pass over every root.
    ///
    /// Leaves are visited top-down, roots in row-major order. For each leaf, any
    /// edge-adjacent leaf more than `level_diff` levels coarser is divided until it is
    /// within the limit. Divisions can create new violations in cells already visited,
    /// so a single pass does not guarantee global balance; see
    /// [`balance_until_stable`](Self::balance_until_stable).
    ///
    /// Returns the number of divisions.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "Grid::balance"))]
    pub fn balance(&mut self, level_diff: u32) -> usize {
        let mut divisions = 0;
        for i in 0..self.roots.len() {
            let rect = self.layout.root_rect(self.layout.pos(i));
            self.balance_subtree(self.roots[i], 0, rect, level_diff, &mut divisions);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(level_diff, divisions, "balance pass");
        divisions
    }

    /// Repeat [`balance`](Self::balance) until a pass divides nothing.
    ///
    /// Afterwards no two edge-adjacent leaves differ by more than `level_diff` levels.
    /// Returns the total number of divisions.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "Grid::balance_until_stable")
    )]
    pub fn balance_until_stable(&mut self, level_diff: u32) -> usize {
        let mut total = 0;
        loop {
            let divisions = self.balance(level_diff);
            if divisions == 0 {
                return total;
            }
            total += divisions;
        }
    }

    /// Mutable payload of `id`.
    pub fn attribute_mut(&mut self, id: CellId) -> Option<&mut A> {
        self.cells.get_mut(id.idx())?.attribute.as_mut()
    }
}

impl<A> Grid<A> {
    pub(crate) fn cell(&self, id: CellId) -> &Cell<A> {
        self.cells.get(id.idx()).expect("dangling CellId")
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell<A> {
        self.cells.get_mut(id.idx()).expect("dangling CellId")
    }

    /// Normalized root layout.
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Number of root rows.
    pub fn rows(&self) -> usize {
        self.layout.rows
    }

    /// Number of root columns.
    pub fn cols(&self) -> usize {
        self.layout.cols
    }

    /// Root edge length.
    pub fn cell_size(&self) -> f64 {
        self.layout.cell_size
    }

    /// Padded bounds covered by the roots.
    pub fn bounds(&self) -> Rect {
        self.layout.bounds()
    }

    /// Number of cells, internal ones included.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_leaf()).count()
    }

    /// Whether `id` is a leaf of this grid.
    pub fn is_leaf(&self, id: CellId) -> bool {
        self.cells.get(id.idx()).is_some_and(Cell::is_leaf)
    }

    /// Parent of `id`; `None` for roots.
    pub fn parent(&self, id: CellId) -> Option<CellId> {
        match self.cells.get(id.idx())?.link {
            Link::Root(_) => None,
            Link::Child(parent) => Some(parent),
        }
    }

    /// Children of `id` in [`Quadrant`] order; `None` for leaves.
    pub fn children(&self, id: CellId) -> Option<[CellId; 4]> {
        self.cells.get(id.idx())?.children
    }

    /// Quadrant `id` occupies in its parent; `None` for roots.
    pub fn quadrant_of(&self, id: CellId) -> Option<Quadrant> {
        let parent = self.parent(id)?;
        Some(self.quadrant_in(parent, id))
    }

    /// Grid position of `id` if it is a root.
    pub fn root_pos_of(&self, id: CellId) -> Option<RootPos> {
        match self.cells.get(id.idx())?.link {
            Link::Root(pos) => Some(pos),
            Link::Child(_) => None,
        }
    }

    /// Number of divisions between `id` and its root; 0 for roots.
    pub fn depth(&self, id: CellId) -> Option<usize> {
        self.cells.get(id.idx())?;
        let mut depth = 0;
        let mut current = id;
        while let Link::Child(parent) = self.cell(current).link {
            depth += 1;
            current = parent;
        }
        Some(depth)
    }

    /// Rectangle of `id`, rebuilt from its root's grid position and its quadrant path.
    pub fn envelope_of(&self, id: CellId) -> Option<Rect> {
        self.cells.get(id.idx())?;
        let mut path = Vec::new();
        let mut current = id;
        let pos = loop {
            match self.cell(current).link {
                Link::Root(pos) => break pos,
                Link::Child(parent) => {
                    path.push(self.quadrant_in(parent, current));
                    current = parent;
                }
            }
        };
        let rect = path
            .iter()
            .rev()
            .fold(self.layout.root_rect(pos), |rect, q| quadrant_rect(rect, *q));
        Some(rect)
    }

    /// Payload of `id`. Internal cells have none once their payload has divided.
    pub fn attribute(&self, id: CellId) -> Option<&A> {
        self.cells.get(id.idx())?.attribute.as_ref()
    }

    /// Leaf containing `pt`, or `None` outside the grid.
    ///
    /// Points on a shared edge belong to the west or south cell, except on the grid's
    /// own east and north boundary.
    pub fn find_cell(&self, pt: Point) -> Option<CellEnvelope> {
        let pos = self.root_at(pt)?;
        let root = self.roots[self.layout.index(pos)];
        Some(self.locate(root, self.layout.root_rect(pos), pt))
    }

    /// Every leaf with its rectangle, roots in row-major order, children in quadrant order.
    pub fn leaf_cells(&self) -> Vec<CellEnvelope> {
        self.enumerate(true)
    }

    /// Every cell, internal ones included, in pre-order.
    pub fn cell_envelopes(&self) -> Vec<CellEnvelope> {
        self.enumerate(false)
    }

    fn enumerate(&self, leaves_only: bool) -> Vec<CellEnvelope> {
        let mut out = Vec::new();
        for (i, root) in self.roots.iter().enumerate() {
            let rect = self.layout.root_rect(self.layout.pos(i));
            self.collect_subtree(*root, rect, leaves_only, &mut out);
        }
        out
    }

    /// Leaves whose rectangle intersects `query`. Touching edges count.
    ///
    /// A query with a non-finite coordinate matches nothing.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "Grid::cells_intersecting_rect")
    )]
    pub fn cells_intersecting_rect(&self, query: Rect) -> Vec<CellEnvelope> {
        let query = query.abs();
        let mut out = Vec::new();
        if !query.is_finite() || !intersects(self.bounds(), query) {
            return out;
        }
        let lo = self.layout.clamped_pos(Point::new(query.x0, query.y0));
        let hi = self.layout.clamped_pos(Point::new(query.x1, query.y1));
        // Roots that only touch the query along a grid line still intersect it.
        let rows = lo.row.saturating_sub(1)..=(hi.row + 1).min(self.layout.rows - 1);
        let cols = lo.col.saturating_sub(1)..=(hi.col + 1).min(self.layout.cols - 1);
        for row in rows {
            for col in cols.clone() {
                let pos = RootPos::new(row, col);
                let root = self.roots[self.layout.index(pos)];
                self.collect_intersecting(root, self.layout.root_rect(pos), query, &mut out);
            }
        }
        out
    }

    /// Leaves touched by the segment `seg`.
    ///
    /// Candidates come from a rectangle query over the segment's inflated bounding
    /// box and are then tested exactly against their own envelope, inflated by
    /// [`LINE_TOLERANCE`] times the root size. A segment with a non-finite endpoint
    /// matches nothing.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, name = "Grid::cells_intersecting_line")
    )]
    pub fn cells_intersecting_line(&self, seg: Line) -> Vec<CellEnvelope> {
        if !(seg.p0.is_finite() && seg.p1.is_finite()) {
            return Vec::new();
        }
        let tol = LINE_TOLERANCE * self.layout.cell_size;
        let bbox = Rect::from_points(seg.p0, seg.p1).inflate(tol, tol);
        let mut out = self.cells_intersecting_rect(bbox);
        out.retain(|e| segment_intersects(seg, e.rect.inflate(tol, tol)));
        out
    }
}
