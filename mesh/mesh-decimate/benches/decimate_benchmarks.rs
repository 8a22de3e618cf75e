//! Benchmarks for mesh-decimate operations.
//!
//! Run with: cargo bench -p mesh-decimate
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-decimate -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-decimate -- --baseline main

#![allow(missing_docs, clippy::unwrap_used)]

use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use mesh_decimate::{DecimateParams, decimate};
use mesh_halfedge::{build_topology, build_topology_with};
use mesh_halfedge::TwinMatch;
use mesh_types::{IndexedMesh, grid_plane};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Terrain tile of `n` x `n` quads (2 * n^2 faces) with rolling hills of the
/// given amplitude.
#[allow(clippy::cast_precision_loss)]
fn create_terrain(n: usize, amplitude: f64) -> IndexedMesh {
    let mut mesh = grid_plane(n, n as f64, 0.0);
    for v in &mut mesh.vertices {
        let (x, y) = (v.position.x * 0.2, v.position.y * 0.15);
        v.position.z = amplitude * (x.sin() + (x + y).cos() * 0.5);
    }
    mesh
}

/// Flat tile whose triangles are duplicated per face, as exported tiles are.
fn create_soup_tile(n: usize) -> IndexedMesh {
    grid_plane(n, 1.0, 0.0).to_soup()
}

// =============================================================================
// Decimation Benchmarks
// =============================================================================

fn bench_decimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("Decimation");
    group.sample_size(20);

    let test_cases = [
        ("terrain_1152tri", create_terrain(24, 2.0)),
        ("terrain_8192tri", create_terrain(64, 2.0)),
        ("flat_8192tri", grid_plane(64, 64.0, 0.0)),
    ];

    let presets = [
        ("default", DecimateParams::default()),
        ("aggressive", DecimateParams::aggressive()),
    ];

    for (name, mesh) in &test_cases {
        group.throughput(Throughput::Elements(mesh.faces.len() as u64));

        for (preset, params) in &presets {
            group.bench_with_input(BenchmarkId::new(*preset, name), mesh, |b, mesh| {
                b.iter_batched(
                    || build_topology(mesh).unwrap(),
                    |mut surface| decimate(black_box(&mut surface), black_box(params)),
                    BatchSize::LargeInput,
                );
            });
        }
    }

    group.finish();
}

fn bench_single_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("Sweep");
    let params = DecimateParams::default().with_iterations(1);

    let terrain = create_terrain(64, 2.0);
    group.throughput(Throughput::Elements(terrain.faces.len() as u64));
    group.bench_function("terrain_8192tri", |b| {
        b.iter_batched(
            || build_topology(&terrain).unwrap(),
            |mut surface| decimate(black_box(&mut surface), black_box(&params)),
            BatchSize::LargeInput,
        );
    });

    // Twins by position, so the post-sweep weld has work to do
    let soup = create_soup_tile(48);
    group.throughput(Throughput::Elements(soup.faces.len() as u64));
    group.bench_function("soup_4608tri", |b| {
        b.iter_batched(
            || build_topology_with(&soup, TwinMatch::Position { tolerance: 0.0 }).unwrap(),
            |mut surface| decimate(black_box(&mut surface), black_box(&params)),
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_decimation, bench_single_sweep);
criterion_main!(benches);
