// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cell nodes and the per-cell algorithms: descent, neighbour search, balancing, pruned traversal.
//!
//! Every traversal here threads the current cell's rectangle explicitly. Passing an
//! envelope that does not belong to the cell is not detected and yields wrong results.

use alloc::vec::Vec;
use kurbo::{Point, Rect};

use crate::attribute::CellAttribute;
use crate::direction::{Direction, Quadrant, QuadrantSet};
use crate::geometry::{intersects, parent_rect, quadrant_rect};
use crate::grid::Grid;
use crate::types::{CellEnvelope, CellId, CellNeighbour, RootPos};

/// How a cell hangs off the structure above it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Link {
    /// Top of one grid-addressed quadtree.
    Root(RootPos),
    /// Child of another cell. The quadrant is derived from the parent's child list.
    Child(CellId),
}

/// One node of one quadtree: a leaf, or internal with exactly four children.
#[derive(Clone, Debug)]
pub(crate) struct Cell<A> {
    pub(crate) link: Link,
    pub(crate) children: Option<[CellId; 4]>,
    pub(crate) attribute: Option<A>,
}

impl<A> Cell<A> {
    pub(crate) fn root(pos: RootPos, attribute: Option<A>) -> Self {
        Self {
            link: Link::Root(pos),
            children: None,
            attribute,
        }
    }

    pub(crate) fn child(parent: CellId, attribute: Option<A>) -> Self {
        Self {
            link: Link::Child(parent),
            children: None,
            attribute,
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

impl<A> Grid<A> {
    /// Descend from `id` (covering `envelope`) to the leaf containing `pt`.
    ///
    /// At each internal cell the quadrant is chosen against the cell's center;
    /// ties go west and south. `pt` is not checked against `envelope`.
    ///
    /// Panics if `id` was not issued by this grid.
    pub fn locate(&self, id: CellId, envelope: Rect, pt: Point) -> CellEnvelope {
        let mut id = id;
        let mut rect = envelope;
        while let Some(children) = self.cell(id).children {
            let q = Quadrant::containing(rect, pt);
            id = children[q.index()];
            rect = quadrant_rect(rect, q);
        }
        CellEnvelope::new(rect, id)
    }

    /// Same-size or coarser cell adjacent to `id` in `dir`.
    ///
    /// `level` is the level to report for a neighbour as fine as `id`; coarser neighbours
    /// report one less per level. Returns `None` at the outer edge of the grid.
    ///
    /// The search climbs to the nearest common ancestor, recording the mirrored quadrant
    /// at every step, and then walks the mirrored path back down from the ancestor (or
    /// from the adjacent root when the climb leaves a root). The descent stops early on
    /// a leaf. Diagonal directions are handled by the same walk: each axis carries on its
    /// own until it resolves.
    ///
    /// Panics if `id` was not issued by this grid.
    pub fn find_neighbor(
        &self,
        id: CellId,
        level: i32,
        dir: Direction,
        envelope: Rect,
    ) -> Option<CellNeighbour> {
        let mut path: Vec<Quadrant> = Vec::new();
        let mut current = id;
        let mut up = envelope;
        let mut pending = dir;
        let (mut node, mut rect) = loop {
            match self.cell(current).link {
                Link::Root(pos) => {
                    let next = self.layout.neighbor(pos, pending)?;
                    break (self.roots[self.layout.index(next)], self.layout.root_rect(next));
                }
                Link::Child(parent) => {
                    let q = self.quadrant_in(parent, current);
                    path.push(pending.step(q));
                    up = parent_rect(up, q);
                    current = parent;
                    match pending.carry(q) {
                        Some(d) => pending = d,
                        None => break (parent, up),
                    }
                }
            }
        };

        let mut remaining = path.len();
        while remaining > 0 {
            let Some(children) = self.cell(node).children else {
                break;
            };
            remaining -= 1;
            let q = path[remaining];
            node = children[q.index()];
            rect = quadrant_rect(rect, q);
        }

        let coarser = i32::try_from(remaining).unwrap_or(i32::MAX);
        Some(CellNeighbour {
            cell: node,
            level: level.saturating_sub(coarser),
            rect,
        })
    }

    /// All leaves bordering `id` across its `dir` side (or corner, for diagonals).
    ///
    /// Finds the same-or-coarser neighbour and then descends into the children of it
    /// that face back toward `id`.
    pub fn leaf_neighbors(&self, id: CellId, envelope: Rect, dir: Direction) -> Vec<CellEnvelope> {
        let mut out = Vec::new();
        if let Some(n) = self.find_neighbor(id, 0, dir, envelope) {
            self.collect_facing_leaves(n.cell, n.rect, dir.opposite().border(), &mut out);
        }
        out
    }

    /// Leaves touching `id` along an edge or at a corner, each reported once.
    pub fn adjacent_leaves(&self, id: CellId, envelope: Rect) -> Vec<CellEnvelope> {
        let mut out = Vec::new();
        for dir in Direction::ALL {
            out.extend(self.leaf_neighbors(id, envelope, dir));
        }
        out.sort_by_key(|e| e.cell);
        out.dedup_by_key(|e| e.cell);
        out
    }

    /// Quadrant that `child` occupies in `parent`.
    pub(crate) fn quadrant_in(&self, parent: CellId, child: CellId) -> Quadrant {
        let children = self.cell(parent).children.expect("parent has no children");
        let i = children
            .iter()
            .position(|c| *c == child)
            .expect("child is not listed by its parent");
        Quadrant::ALL[i]
    }

    fn collect_facing_leaves(
        &self,
        id: CellId,
        rect: Rect,
        side: QuadrantSet,
        out: &mut Vec<CellEnvelope>,
    ) {
        match self.cell(id).children {
            None => out.push(CellEnvelope::new(rect, id)),
            Some(children) => {
                for q in side.quadrants() {
                    self.collect_facing_leaves(children[q.index()], quadrant_rect(rect, q), side, out);
                }
            }
        }
    }

    /// Pre-order walk of the subtree at `id`, collecting leaves or every cell.
    pub(crate) fn collect_subtree(
        &self,
        id: CellId,
        rect: Rect,
        leaves_only: bool,
        out: &mut Vec<CellEnvelope>,
    ) {
        let children = self.cell(id).children;
        if children.is_none() || !leaves_only {
            out.push(CellEnvelope::new(rect, id));
        }
        if let Some(children) = children {
            for q in Quadrant::ALL {
                self.collect_subtree(children[q.index()], quadrant_rect(rect, q), leaves_only, out);
            }
        }
    }

    /// Leaves of the subtree at `id` whose rectangle touches `query`.
    pub(crate) fn collect_intersecting(
        &self,
        id: CellId,
        rect: Rect,
        query: Rect,
        out: &mut Vec<CellEnvelope>,
    ) {
        if !intersects(rect, query) {
            return;
        }
        match self.cell(id).children {
            None => out.push(CellEnvelope::new(rect, id)),
            Some(children) => {
                for q in Quadrant::ALL {
                    self.collect_intersecting(children[q.index()], quadrant_rect(rect, q), query, out);
                }
            }
        }
    }
}

impl<A: CellAttribute> Grid<A> {
    /// Divide every leaf under `id` until it is no larger than `max_size` on either side.
    pub(crate) fn divide_subtree_to_size(
        &mut self,
        id: CellId,
        rect: Rect,
        max_size: f64,
        divisions: &mut usize,
    ) {
        if rect.width() <= max_size && rect.height() <= max_size {
            return;
        }
        let children = match self.cell(id).children {
            Some(children) => children,
            None => {
                let Some(children) = self.divide(id, rect) else {
                    return;
                };
                *divisions += 1;
                children
            }
        };
        for q in Quadrant::ALL {
            self.divide_subtree_to_size(children[q.index()], quadrant_rect(rect, q), max_size, divisions);
        }
    }

    /// One descending balancing pass over the subtree at `id`.
    ///
    /// For every leaf and each edge direction, a leaf neighbour coarser by more than
    /// `level_diff` levels is divided, repeatedly, until it is within the limit.
    /// Divisions made here can unbalance cells that were already visited.
    pub(crate) fn balance_subtree(
        &mut self,
        id: CellId,
        level: i32,
        rect: Rect,
        level_diff: u32,
        divisions: &mut usize,
    ) {
        if let Some(children) = self.cell(id).children {
            for q in Quadrant::ALL {
                self.balance_subtree(
                    children[q.index()],
                    level + 1,
                    quadrant_rect(rect, q),
                    level_diff,
                    divisions,
                );
            }
            return;
        }
        for dir in Direction::CARDINAL {
            while let Some(n) = self.find_neighbor(id, level, dir, rect) {
                let gap = i64::from(level) - i64::from(n.level);
                if !self.cell(n.cell).is_leaf() || gap <= i64::from(level_diff) {
                    break;
                }
                if self.divide(n.cell, n.rect).is_none() {
                    break;
                }
                *divisions += 1;
            }
        }
    }
}
