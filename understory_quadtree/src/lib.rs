// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_quadtree --heading-base-level=0

//! Understory Quadtree: a Kurbo-native grid of adaptive quadtrees.
//!
//! A [`Grid`] tiles a bounding rectangle with square root cells. Each root is the top of
//! an independent quadtree whose leaves can be divided into four equal quadrants, as
//! often as needed. It is a building block for adaptive meshing, proximity search and
//! multi-resolution sampling.
//!
//! - Point location: [`Grid::find_cell`] descends to the leaf containing a point.
//! - Queries: [`Grid::cells_intersecting_rect`] and [`Grid::cells_intersecting_line`]
//!   prune whole subtrees that miss the query.
//! - Neighbours: [`Grid::find_neighbor`] walks to the common ancestor and back down,
//!   crossing root boundaries, in all eight directions.
//! - Refinement: explicit division, [`Grid::divide_to_size`], and level balancing with
//!   [`Grid::balance`] / [`Grid::balance_until_stable`].
//!
//! ## Implicit geometry
//!
//! Cells store no rectangle. Every query rebuilds geometry top-down from the grid
//! layout and returns [`CellEnvelope`]s pairing a [`CellId`] with its rectangle.
//! Methods that start from a cell, such as [`Grid::find_neighbor`], take that cell's
//! envelope as an argument; passing a rectangle that does not belong to the cell is
//! not detected.
//!
//! The axis convention is `y` up: north is `+y`, and root row 0 is the southern-most
//! row. Points on a center line resolve to the west or south child.
//!
//! ## Payloads
//!
//! Each cell can carry a payload `A: `[`CellAttribute`]. A factory closure supplied at
//! construction creates the payload of every new leaf, and the parent's payload may
//! redistribute itself into its children through [`CellAttribute::divide`].
//!
//! ## Example
//!
//! ```rust
//! use kurbo::{Point, Rect};
//! use understory_quadtree::{Direction, Grid};
//!
//! // Four roots of 2×2 over (0,0)-(4,4).
//! let mut grid: Grid = Grid::new(Rect::new(0.0, 0.0, 4.0, 4.0), 2.0);
//! assert_eq!((grid.rows(), grid.cols()), (2, 2));
//!
//! // Divide the south-west root once.
//! grid.divide_cell(Point::new(0.5, 0.5)).unwrap();
//! assert_eq!(grid.leaf_cells().len(), 7);
//!
//! // The leaf holding a point, and its coarser neighbour to the east.
//! let leaf = grid.find_cell(Point::new(1.5, 0.5)).unwrap();
//! assert_eq!(leaf.rect, Rect::new(1.0, 0.0, 2.0, 1.0));
//! let east = grid.find_neighbor(leaf.cell, 1, Direction::East, leaf.rect).unwrap();
//! assert_eq!(east.rect, Rect::new(2.0, 0.0, 4.0, 2.0));
//! assert_eq!(east.level, 0);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to Kurbo's `std` feature.
//! - `libm`: forwards to Kurbo's `libm` feature for `no_std` builds.
//! - `tracing`: spans and division counts for bulk operations via the `tracing` crate.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod attribute;
mod cell;
mod config;
mod direction;
pub mod geometry;
mod grid;
mod root;
mod types;

pub use attribute::CellAttribute;
pub use config::{GridConfig, GridLayout};
pub use direction::{Axis, Direction, Quadrant, QuadrantSet};
pub use grid::{Grid, LINE_TOLERANCE};
pub use types::{CellEnvelope, CellId, CellNeighbour, RootPos};

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use kurbo::{Line, Point, Rect};

    fn contains_point(r: Rect, p: Point) -> bool {
        p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
    }

    /// Forces the corner around (1, 1) of a 4×4 grid down to level 3.
    fn refined_corner() -> Grid {
        let mut grid: Grid = Grid::new(Rect::new(0.0, 0.0, 4.0, 4.0), 1.0);
        for _ in 0..3 {
            grid.divide_cell(Point::new(0.9, 0.9)).unwrap();
        }
        grid
    }

    /// Every pair of edge-sharing leaves, found through neighbour search.
    fn max_edge_level_gap(grid: &Grid) -> u32 {
        let mut worst = 0;
        for leaf in grid.leaf_cells() {
            let depth = grid.depth(leaf.cell).unwrap();
            for dir in Direction::CARDINAL {
                for n in grid.leaf_neighbors(leaf.cell, leaf.rect, dir) {
                    let other = grid.depth(n.cell).unwrap();
                    worst = worst.max(u32::try_from(depth.abs_diff(other)).unwrap());
                }
            }
        }
        worst
    }

    #[test]
    fn two_by_two_scenario() {
        let mut grid: Grid = Grid::new(Rect::new(0.0, 0.0, 4.0, 4.0), 2.0);
        assert_eq!((grid.rows(), grid.cols()), (2, 2));
        let children = grid.divide_cell(Point::new(0.5, 0.5)).unwrap();
        let root = grid.root(RootPos::new(0, 0)).unwrap();
        for child in children {
            assert_eq!(grid.parent(child), Some(root), "only root (0,0) divides");
        }
        for pos in [RootPos::new(0, 1), RootPos::new(1, 0), RootPos::new(1, 1)] {
            assert!(grid.is_leaf(grid.root(pos).unwrap()), "{pos:?} untouched");
        }
        assert_eq!(grid.leaf_cells().len(), 4 + 3);
    }

    #[test]
    fn locate_contains_every_sample_point() {
        let mut grid: Grid = Grid::new(Rect::new(-3.0, -1.0, 5.0, 4.0), 1.5);
        grid.refine_at(Point::new(0.3, 0.3), 0.1);
        grid.refine_at(Point::new(4.9, 3.9), 0.2);
        let b = grid.bounds();
        let steps = 37;
        for i in 0..=steps {
            for j in 0..=steps {
                let p = Point::new(
                    b.x0 + b.width() * f64::from(i) / f64::from(steps),
                    b.y0 + b.height() * f64::from(j) / f64::from(steps),
                );
                let hit = grid.find_cell(p).expect("inside the bounds");
                assert!(contains_point(hit.rect, p), "{p:?} not in {:?}", hit.rect);
                assert!(grid.is_leaf(hit.cell), "{p:?}");
                assert_eq!(grid.envelope_of(hit.cell), Some(hit.rect), "{p:?}");
            }
        }
    }

    #[test]
    fn leaves_tile_the_grid() {
        let grid = refined_corner();
        let total: f64 = grid.leaf_cells().iter().map(|e| e.rect.area()).sum();
        assert_eq!(total, grid.bounds().area(), "no gap and no overlap");
        assert_eq!(grid.leaf_count(), 16 + 3 * 3);
    }

    #[test]
    fn balance_bounds_edge_level_gap() {
        let mut grid = refined_corner();
        assert_eq!(max_edge_level_gap(&grid), 3, "unbalanced before");
        let divisions = grid.balance(1);
        assert!(divisions > 0, "the corner forces divisions");
        assert!(
            max_edge_level_gap(&grid) <= 1,
            "gap is {}",
            max_edge_level_gap(&grid)
        );
    }

    #[test]
    fn balance_until_stable_reaches_any_limit() {
        for k in 0..3 {
            let mut grid = refined_corner();
            grid.balance_until_stable(k);
            assert!(max_edge_level_gap(&grid) <= k, "level_diff {k}");
            assert_eq!(grid.balance(k), 0, "a further pass is a no-op for {k}");
        }
    }

    #[test]
    fn rect_query_matches_brute_force() {
        let mut grid = refined_corner();
        grid.refine_at(Point::new(2.6, 3.1), 0.25);
        let queries = [
            Rect::new(0.8, 0.8, 1.2, 1.2),
            Rect::new(-1.0, -1.0, 0.1, 0.1),
            Rect::new(0.5, 2.5, 3.5, 3.3),
            Rect::new(1.0, 1.0, 2.0, 2.0),
            Rect::new(10.0, 10.0, 11.0, 11.0),
            Rect::new(-5.0, -5.0, 10.0, 10.0),
            Rect::new(0.875, 0.0, 0.875, 4.0),
        ];
        let leaves = grid.leaf_cells();
        for q in queries {
            let mut got: Vec<CellId> = grid
                .cells_intersecting_rect(q)
                .iter()
                .map(|e| e.cell)
                .collect();
            let mut want: Vec<CellId> = leaves
                .iter()
                .filter(|e| geometry::intersects(e.rect, q))
                .map(|e| e.cell)
                .collect();
            got.sort();
            want.sort();
            assert_eq!(got, want, "{q:?}");
        }
        assert!(
            grid.cells_intersecting_rect(Rect::new(10.0, 10.0, 11.0, 11.0))
                .is_empty(),
            "outside the grid"
        );
        assert_eq!(
            grid.cells_intersecting_rect(Rect::new(-5.0, -5.0, 10.0, 10.0))
                .len(),
            leaves.len(),
            "covering query returns every leaf"
        );
    }

    /// Roots of a size that is not a power of two, on an origin that is not either.
    fn uneven_grid() -> Grid {
        let mut grid: Grid = Grid::new(Rect::new(0.1, 0.3, 1.7, 2.9), 0.13);
        grid.refine_at(Point::new(0.71, 1.37), 0.02);
        grid.refine_at(Point::new(1.69, 2.89), 0.05);
        grid.divide_cell(Point::new(0.2, 2.5)).unwrap();
        grid
    }

    #[test]
    fn uneven_rect_query_matches_brute_force() {
        let grid = uneven_grid();
        let leaves = grid.leaf_cells();
        let mut queries: Vec<Rect> = Vec::new();
        for root in grid.roots() {
            let r = root.rect;
            queries.push(r);
            queries.push(Rect::new(r.x0, r.y0, r.x0, r.y0));
            queries.push(Rect::new(r.x1, r.y1, r.x1, r.y1));
        }
        queries.extend(leaves.iter().map(|e| e.rect));
        for q in queries {
            let mut got: Vec<CellId> = grid
                .cells_intersecting_rect(q)
                .iter()
                .map(|e| e.cell)
                .collect();
            let mut want: Vec<CellId> = leaves
                .iter()
                .filter(|e| geometry::intersects(e.rect, q))
                .map(|e| e.cell)
                .collect();
            got.sort();
            want.sort();
            assert_eq!(got, want, "{q:?}");
        }
    }

    #[test]
    fn uneven_root_corners_are_located() {
        let grid = uneven_grid();
        for root in grid.roots() {
            let r = root.rect;
            for p in [
                Point::new(r.x0, r.y0),
                Point::new(r.x1, r.y0),
                Point::new(r.x0, r.y1),
                Point::new(r.x1, r.y1),
            ] {
                let hit = grid.find_cell(p).expect("root corners are inside the grid");
                assert!(contains_point(hit.rect, p), "{p:?} not in {:?}", hit.rect);
                assert!(grid.is_leaf(hit.cell), "{p:?}");
            }
        }
    }

    #[test]
    fn line_query_matches_exact_test() {
        let mut grid = refined_corner();
        grid.divide_to_size(0.5);
        let segments = [
            Line::new(Point::new(0.05, 3.7), Point::new(3.9, 0.2)),
            Line::new(Point::new(0.0, 1.0), Point::new(4.0, 1.0)),
            Line::new(Point::new(2.3, 2.3), Point::new(2.4, 2.35)),
            Line::new(Point::new(5.0, 5.0), Point::new(6.0, 7.0)),
        ];
        let leaves = grid.leaf_cells();
        let tol = LINE_TOLERANCE * grid.cell_size();
        for seg in segments {
            let mut got: Vec<CellId> = grid
                .cells_intersecting_line(seg)
                .iter()
                .map(|e| e.cell)
                .collect();
            let mut want: Vec<CellId> = leaves
                .iter()
                .filter(|e| geometry::segment_intersects(seg, e.rect.inflate(tol, tol)))
                .map(|e| e.cell)
                .collect();
            got.sort();
            want.sort();
            assert_eq!(got, want, "{seg:?}");
        }
    }

    #[derive(Debug, PartialEq)]
    struct Mass(f64);

    impl CellAttribute for Mass {
        fn divide(self, _envelope: Rect, children: &mut [Option<Self>; 4]) {
            for child in children.iter_mut() {
                *child = Some(Self(self.0 / 4.0));
            }
        }
    }

    #[test]
    fn payload_is_conserved_through_refinement() {
        let mut grid = Grid::from_config(
            GridConfig::new(Rect::new(0.0, 0.0, 2.0, 2.0)).with_cell_size(1.0),
            |_| Some(Mass(1.0)),
        );
        grid.refine_at(Point::new(0.2, 0.2), 0.1);
        grid.balance_until_stable(1);
        let total: f64 = grid
            .leaf_cells()
            .iter()
            .map(|e| grid.attribute(e.cell).expect("leaves keep a payload").0)
            .sum();
        assert_eq!(total, 4.0, "quarters of quarters sum exactly");
        for cell in grid.cell_envelopes() {
            if !grid.is_leaf(cell.cell) {
                assert!(grid.attribute(cell.cell).is_none(), "internal {cell:?}");
            }
        }
    }

    #[test]
    fn adjacent_leaves_of_a_fine_cell() {
        let mut grid = refined_corner();
        grid.balance_until_stable(1);
        let leaf = grid.find_cell(Point::new(0.9, 0.9)).unwrap();
        let adj = grid.adjacent_leaves(leaf.cell, leaf.rect);
        assert!(!adj.is_empty(), "an interior cell has neighbours");
        for n in &adj {
            assert_ne!(n.cell, leaf.cell, "a cell is not its own neighbour");
            let touching = geometry::intersects(n.rect, leaf.rect)
                && n.rect.intersect(leaf.rect).area() == 0.0;
            assert!(touching, "{n:?} must touch {leaf:?} without overlap");
        }
    }
}
