// Copyright 2025 the Thicket Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::f64::consts::TAU;
use std::rc::Rc;

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect, Vec2};
use thicket_geometry::{Command, CommandTape, Layer, LayerProps, MarkProps, MarkType, Section};
use thicket_index::{IndexMode, SpatialIndex};
use thicket_select::{SelectCallbacks, SelectManager};

/// A `side` x `side` scatter of filled dots, 10px apart.
fn scatter(side: u32) -> Rc<Layer> {
    let extent = f64::from(side) * 10.0;
    let r = Rect::new(0.0, 0.0, extent, extent);
    let section = Rc::new(Section::new("plot", r, r));
    let tapes = (0..side * side)
        .map(|i| {
            let x = 5.0 + f64::from(i % side) * 10.0;
            let y = 5.0 + f64::from(i / side) * 10.0;
            CommandTape::new(vec![Command::arc(x, y, 4.0, 0.0, TAU, false)]).unwrap()
        })
        .collect();
    let props = LayerProps::uniform(MarkProps {
        fill: Some("steelblue".into()),
        ..MarkProps::default()
    });
    Rc::new(Layer::new("dots", MarkType::Point, tapes, section).with_props(props))
}

fn bench_index_layer(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_layer");
    for &side in &[32u32, 100] {
        let layer = scatter(side);
        for mode in [IndexMode::Extent, IndexMode::Centroid] {
            group.bench_function(BenchmarkId::new(format!("{mode:?}"), side * side), |b| {
                b.iter_batched(
                    || SpatialIndex::new(mode),
                    |mut index| {
                        index.index_layer(&layer).unwrap();
                        index
                    },
                    BatchSize::SmallInput,
                );
            });
        }
    }
    group.finish();
}

fn bench_query_point(c: &mut Criterion) {
    let layer = scatter(100);
    let mut index = SpatialIndex::new(IndexMode::Extent);
    index.index_layer(&layer).unwrap();
    let points: Vec<Point> = (0..1000_u32)
        .map(|i| Point::new(f64::from(i % 97) * 10.3, f64::from(i % 89) * 11.1))
        .collect();
    c.bench_function("query_point_10k_dots", |b| {
        b.iter(|| {
            let mut hits = 0;
            for p in &points {
                hits += index.query_point(black_box(*p)).len();
            }
            hits
        });
    });
}

fn bench_lasso(c: &mut Criterion) {
    let layer = scatter(100);
    let mut manager = SelectManager::new();
    manager.load_layer(&layer, SelectCallbacks::new()).unwrap();
    let center = Point::new(500.0, 500.0);
    let outline: Vec<Point> = (0..64_u32)
        .map(|k| center + Vec2::from_angle(TAU * f64::from(k) / 64.0) * 300.0)
        .collect();
    c.bench_function("lasso_64_vertices_10k_dots", |b| {
        b.iter(|| {
            manager.start_select_polygon(outline[0]);
            for &p in &outline[1..] {
                manager.add_point_to_select_polygon(black_box(p));
            }
            let selected = manager.selection().len();
            manager.reset_select_polygon();
            selected
        });
    });
}

criterion_group!(benches, bench_index_layer, bench_query_point, bench_lasso);
criterion_main!(benches);
