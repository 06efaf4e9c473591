// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use understory_quadtree::Grid;

fn square_grid(n: usize) -> Grid {
    let extent = n as f64;
    Grid::new(Rect::new(0.0, 0.0, extent, extent), 1.0)
}

fn bench_divide_to_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("divide_to_size");
    for &n in &[8usize, 16, 32] {
        // Three levels below every root.
        group.throughput(Throughput::Elements((n * n * 64) as u64));
        group.bench_function(format!("uniform_n{}", n), |b| {
            b.iter_batched(
                || square_grid(n),
                |mut grid| black_box(grid.divide_to_size(0.125)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_balance(c: &mut Criterion) {
    let mut group = c.benchmark_group("balance");
    for &n in &[8usize, 16, 32] {
        // A deep spike in the middle of the grid, balanced out to its surroundings.
        let center = Point::new(n as f64 * 0.5 + 0.01, n as f64 * 0.5 + 0.01);
        group.bench_function(format!("single_pass_spike_n{}", n), |b| {
            b.iter_batched(
                || {
                    let mut grid = square_grid(n);
                    let _ = grid.refine_at(center, 1.0 / 256.0);
                    grid
                },
                |mut grid| black_box(grid.balance(1)),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("until_stable_spike_n{}", n), |b| {
            b.iter_batched(
                || {
                    let mut grid = square_grid(n);
                    let _ = grid.refine_at(center, 1.0 / 256.0);
                    grid
                },
                |mut grid| black_box(grid.balance_until_stable(1)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_neighbors(c: &mut Criterion) {
    let mut group = c.benchmark_group("adjacent_leaves");
    let mut grid = square_grid(16);
    let _ = grid.refine_at(Point::new(8.01, 8.01), 1.0 / 64.0);
    let _ = grid.balance_until_stable(1);
    let leaves = grid.leaf_cells();
    group.throughput(Throughput::Elements(leaves.len() as u64));
    group.bench_function("all_leaves_n16", |b| {
        b.iter(|| {
            let total: usize = leaves
                .iter()
                .map(|e| grid.adjacent_leaves(e.cell, e.rect).len())
                .sum();
            black_box(total)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_divide_to_size, bench_balance, bench_neighbors);
criterion_main!(benches);
