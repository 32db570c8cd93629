// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use thicket_rtree::{Aabb2D, RTree, RTreeConfig};

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
}

/// `count` boxes up to 20x20 scattered over a 2000x2000 world.
fn random_boxes(count: usize) -> Vec<(Aabb2D, usize)> {
    let mut rng = Rng::new(0x3C6E_F35F_4750_2932);
    (0..count)
        .map(|i| {
            let x = rng.next_f64() * 2000.0;
            let y = rng.next_f64() * 2000.0;
            let w = rng.next_f64() * 20.0;
            let h = rng.next_f64() * 20.0;
            (Aabb2D::new(x, y, x + w, y + h), i)
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_build");
    for &n in &[1_000usize, 10_000, 100_000] {
        let items = random_boxes(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("insert", n), &items, |b, items| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut tree = RTree::new();
                    for item in items {
                        tree.insert(item);
                    }
                    tree
                },
                BatchSize::LargeInput,
            );
        });
        group.bench_with_input(BenchmarkId::new("load", n), &items, |b, items| {
            b.iter_batched(
                || items.clone(),
                |items| {
                    let mut tree = RTree::new();
                    tree.load(items);
                    tree
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_search");
    let items = random_boxes(100_000);
    for &max_entries in &[4usize, 9, 16] {
        let mut tree = RTree::with_config(RTreeConfig { max_entries });
        tree.load(items.iter().copied());
        let mut rng = Rng::new(0x81FD_BEE7_94F0_AF1A);
        let queries: Vec<Aabb2D> = (0..256)
            .map(|_| {
                let x = rng.next_f64() * 1900.0;
                let y = rng.next_f64() * 1900.0;
                Aabb2D::new(x, y, x + 100.0, y + 100.0)
            })
            .collect();
        group.bench_function(BenchmarkId::new("window_100", max_entries), |b| {
            b.iter(|| {
                let mut found = 0;
                for q in &queries {
                    found += tree.search(black_box(q)).len();
                }
                found
            });
        });
        group.bench_function(BenchmarkId::new("point", max_entries), |b| {
            b.iter(|| {
                let mut found = 0;
                for q in &queries {
                    let p = Aabb2D::from_point(q.min_x, q.min_y);
                    found += tree.search(black_box(&p)).len();
                }
                found
            });
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let items = random_boxes(10_000);
    let mut base = RTree::new();
    base.load(items.iter().copied());
    c.bench_function("rtree_remove_half", |b| {
        b.iter_batched(
            || base.clone(),
            |mut tree| {
                for item in items.iter().step_by(2) {
                    tree.remove(item);
                }
                tree
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_build, bench_search, bench_remove);
criterion_main!(benches);
