// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree basics.
//!
//! Build a grid, divide a cell, locate points, and run rectangle and line queries.
//!
//! Run:
//! - `cargo run -p understory_examples --example quadtree_basics`

use kurbo::{Line, Point, Rect};
use understory_quadtree::{Direction, Grid, RootPos};

fn main() {
    // 2×2 roots of size 2 over (0,0)-(4,4).
    let mut grid: Grid = Grid::new(Rect::new(0.0, 0.0, 4.0, 4.0), 2.0);
    println!("{} rows × {} cols, bounds {:?}", grid.rows(), grid.cols(), grid.bounds());

    // Divide only the south-west root.
    let children = grid.divide_cell(Point::new(0.5, 0.5)).unwrap();
    println!("children of root (0,0): {:?}", children);
    let leaves = grid.leaf_cells();
    println!("leaves: {}", leaves.len());
    assert_eq!(leaves.len(), 7, "three untouched roots plus four children");

    // Point location returns the leaf with its rectangle.
    let leaf = grid.find_cell(Point::new(0.3, 1.7)).unwrap();
    println!("(0.3, 1.7) is in {:?}", leaf.rect);
    assert_eq!(leaf.rect, Rect::new(0.0, 1.0, 1.0, 2.0), "north-west quadrant");

    // Neighbours may be coarser and may live in another root.
    let north = grid
        .find_neighbor(leaf.cell, 1, Direction::North, leaf.rect)
        .unwrap();
    println!("north of it: {:?} at level {}", north.rect, north.level);
    assert_eq!(grid.root_pos_of(north.cell), Some(RootPos::new(1, 0)), "root above");

    // Rectangle and segment queries return the touched leaves.
    for hit in grid.cells_intersecting_rect(Rect::new(0.8, 0.8, 2.5, 1.2)) {
        println!("rect hit: {:?}", hit.rect);
    }
    let seg = Line::new(Point::new(0.1, 3.9), Point::new(3.9, 0.1));
    for hit in grid.cells_intersecting_line(seg) {
        println!("line hit: {:?}", hit.rect);
    }

    // The outer ring of the grid, counter-clockwise from the south-west corner.
    println!("boundary: {:?}", grid.boundary_points());
}
