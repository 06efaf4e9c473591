// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Line, Point, Rect};
use understory_quadtree::Grid;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn point_in(&mut self, r: Rect) -> Point {
        Point::new(
            r.x0 + self.next_f64() * r.width(),
            r.y0 + self.next_f64() * r.height(),
        )
    }
}

/// `n × n` roots of size 10, refined down to 0.625 around clustered points.
fn clustered_grid(n: usize, clusters: usize, per_cluster: usize) -> Grid {
    let extent = n as f64 * 10.0;
    let mut grid: Grid = Grid::new(Rect::new(0.0, 0.0, extent, extent), 10.0);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    for _ in 0..clusters {
        let center = rng.point_in(grid.bounds());
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * 20.0;
            let dy = (rng.next_f64() - 0.5) * 20.0;
            let _ = grid.refine_at(Point::new(center.x + dx, center.y + dy), 0.625);
        }
    }
    let _ = grid.balance_until_stable(1);
    grid
}

fn bench_point_location(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_cell");
    for &n in &[8usize, 32, 64] {
        let grid = clustered_grid(n, n, 64);
        let mut rng = Rng::new(0xBADC_F00D_1234_5678);
        let points: Vec<Point> = (0..4096).map(|_| rng.point_in(grid.bounds())).collect();
        group.throughput(Throughput::Elements(points.len() as u64));
        group.bench_function(format!("clustered_n{}", n), |b| {
            b.iter(|| {
                let mut area = 0.0;
                for p in &points {
                    if let Some(hit) = grid.find_cell(black_box(*p)) {
                        area += hit.rect.area();
                    }
                }
                black_box(area)
            });
        });
    }
    group.finish();
}

fn bench_rect_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("cells_intersecting_rect");
    for &n in &[8usize, 32, 64] {
        let grid = clustered_grid(n, n, 64);
        let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
        let queries: Vec<Rect> = (0..256)
            .map(|_| {
                let p = rng.point_in(grid.bounds());
                Rect::from_origin_size(p, (15.0, 15.0))
            })
            .collect();
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(format!("clustered_n{}", n), |b| {
            b.iter(|| {
                let hits: usize = queries
                    .iter()
                    .map(|q| grid.cells_intersecting_rect(black_box(*q)).len())
                    .sum();
                black_box(hits)
            });
        });
    }
    group.finish();
}

fn bench_line_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("cells_intersecting_line");
    for &n in &[8usize, 32] {
        let grid = clustered_grid(n, n, 64);
        let mut rng = Rng::new(0x0DDB_A11C_0FFE_E123);
        let segments: Vec<Line> = (0..256)
            .map(|_| Line::new(rng.point_in(grid.bounds()), rng.point_in(grid.bounds())))
            .collect();
        group.throughput(Throughput::Elements(segments.len() as u64));
        group.bench_function(format!("random_segments_n{}", n), |b| {
            b.iter(|| {
                let hits: usize = segments
                    .iter()
                    .map(|s| grid.cells_intersecting_line(black_box(*s)).len())
                    .sum();
                black_box(hits)
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_point_location,
    bench_rect_query,
    bench_line_query,
);
criterion_main!(benches);
