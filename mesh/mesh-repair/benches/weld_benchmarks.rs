//! Benchmarks for mesh-repair operations.
//!
//! Run with: cargo bench -p mesh-repair
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-repair -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-repair -- --baseline main

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_halfedge::build_topology;
use mesh_repair::{RepairParams, WeldParams, repair_surface, weld_vertices};
use mesh_types::grid_plane;

// =============================================================================
// Welding Benchmarks
// =============================================================================

fn bench_weld(c: &mut Criterion) {
    let mut group = c.benchmark_group("Weld");

    for n in [16usize, 64, 128] {
        let soup = grid_plane(n, 10.0, 0.0).to_soup();
        let surface = build_topology(&soup).unwrap();
        group.throughput(Throughput::Elements(soup.vertices.len() as u64));

        group.bench_with_input(BenchmarkId::new("exact", n), &surface, |b, surface| {
            let params = WeldParams::exact();
            b.iter(|| {
                let mut s = surface.clone();
                weld_vertices(black_box(&mut s), black_box(&params))
            });
        });

        group.bench_with_input(BenchmarkId::new("tolerance", n), &surface, |b, surface| {
            let params = WeldParams::geometry_only(1e-4);
            b.iter(|| {
                let mut s = surface.clone();
                weld_vertices(black_box(&mut s), black_box(&params))
            });
        });
    }

    group.finish();
}

// =============================================================================
// Full Repair Benchmarks
// =============================================================================

fn bench_repair(c: &mut Criterion) {
    let mut group = c.benchmark_group("Repair");
    group.sample_size(20);

    for n in [32usize, 128] {
        let surface = build_topology(&grid_plane(n, 10.0, 0.0).to_soup()).unwrap();
        group.throughput(Throughput::Elements(surface.face_count() as u64));

        group.bench_with_input(BenchmarkId::new("soup_import", n), &surface, |b, surface| {
            let params = RepairParams::for_soup_import();
            b.iter(|| {
                let mut s = surface.clone();
                repair_surface(black_box(&mut s), black_box(&params))
            });
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_weld, bench_repair);
criterion_main!(benches);
