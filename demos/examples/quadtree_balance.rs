// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadtree balancing.
//!
//! Refine one corner of a grid deeply, then balance it so that edge-adjacent leaves
//! differ by at most one level. Payloads split their mass between children.
//!
//! Run:
//! - `cargo run -p understory_examples --example quadtree_balance`

use kurbo::{Point, Rect};
use understory_quadtree::{CellAttribute, Direction, Grid, GridConfig};

/// A quantity that is shared out evenly when its cell divides.
#[derive(Debug)]
struct Mass(f64);

impl CellAttribute for Mass {
    fn divide(self, _envelope: Rect, children: &mut [Option<Self>; 4]) {
        for child in children.iter_mut() {
            *child = Some(Self(self.0 / 4.0));
        }
    }
}

fn worst_edge_gap(grid: &Grid<Mass>) -> usize {
    let mut worst = 0;
    for leaf in grid.leaf_cells() {
        let depth = grid.depth(leaf.cell).unwrap_or(0);
        for dir in Direction::CARDINAL {
            for n in grid.leaf_neighbors(leaf.cell, leaf.rect, dir) {
                worst = worst.max(depth.abs_diff(grid.depth(n.cell).unwrap_or(0)));
            }
        }
    }
    worst
}

fn total_mass(grid: &Grid<Mass>) -> f64 {
    grid.leaf_cells()
        .iter()
        .filter_map(|e| grid.attribute(e.cell))
        .map(|m| m.0)
        .sum()
}

fn main() {
    let config = GridConfig::new(Rect::new(0.0, 0.0, 4.0, 4.0)).with_cell_size(1.0);
    let mut grid = Grid::from_config(config, |_| Some(Mass(1.0)));

    // Three divisions around (0.9, 0.9) push one corner to level 3.
    for _ in 0..3 {
        grid.divide_cell(Point::new(0.9, 0.9));
    }
    println!(
        "before: {} leaves, worst edge gap {}, mass {}",
        grid.leaf_count(),
        worst_edge_gap(&grid),
        total_mass(&grid)
    );

    let divisions = grid.balance(1);
    println!(
        "one pass: {divisions} divisions, {} leaves, worst edge gap {}",
        grid.leaf_count(),
        worst_edge_gap(&grid)
    );

    // Going deeper in another spot and settling the whole grid.
    let _ = grid.refine_at(Point::new(3.1, 2.9), 1.0 / 32.0);
    let divisions = grid.balance_until_stable(1);
    println!(
        "until stable: {divisions} divisions, {} leaves, worst edge gap {}, mass {}",
        grid.leaf_count(),
        worst_edge_gap(&grid),
        total_mass(&grid)
    );
    assert!(worst_edge_gap(&grid) <= 1, "balanced to one level");

    let leaf = grid.find_cell(Point::new(3.1, 2.9)).unwrap();
    println!(
        "leaf at (3.1, 2.9): {:?}, {} adjacent leaves",
        leaf.rect,
        grid.adjacent_leaves(leaf.cell, leaf.rect).len()
    );
}
