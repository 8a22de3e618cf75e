//! Property-based tests for atlas packing.
//!
//! Run with: cargo test -p mesh-atlas -- proptest

use image::{Rgba, RgbaImage};
use mesh_atlas::{AtlasParams, GuillotinePacker, PixelRect, pack_texture_atlas};
use mesh_halfedge::build_topology;
use mesh_types::{IndexedMesh, Vertex};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

fn arb_sizes() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((1u32..120, 1u32..120), 1..40)
}

/// Separate triangles, each sampling a random uv box.
fn arb_islands() -> impl Strategy<Value = IndexedMesh> {
    let uv_box = (0.0f64..0.9, 0.0f64..0.9, 0.01f64..0.1, 0.01f64..0.1);
    prop::collection::vec(uv_box, 1..12).prop_map(|boxes| {
        let mut mesh = IndexedMesh::new();
        for (i, (u, v, du, dv)) in boxes.into_iter().enumerate() {
            let x = i as f64 * 2.0;
            let base = mesh.vertices.len() as u32;
            mesh.vertices.push(Vertex::from_coords(x, 0.0, 0.0).with_uv(u, v));
            mesh.vertices.push(Vertex::from_coords(x + 1.0, 0.0, 0.0).with_uv(u + du, v));
            mesh.vertices.push(Vertex::from_coords(x, 1.0, 0.0).with_uv(u, v + dv));
            mesh.faces.push([base, base + 1, base + 2]);
        }
        mesh
    })
}

fn disjoint(rects: &[PixelRect]) -> bool {
    rects
        .iter()
        .enumerate()
        .all(|(i, a)| rects[i + 1..].iter().all(|b| !a.overlaps(b)))
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Placements never overlap and always lie inside the bounds.
    #[test]
    fn packing_is_disjoint_and_contained(sizes in arb_sizes()) {
        let mut packer = GuillotinePacker::new();
        let placed: Vec<PixelRect> = sizes.iter().map(|&(w, h)| packer.insert(w, h)).collect();

        prop_assert!(disjoint(&placed));
        let bounds = packer.bounds();
        for (r, &(w, h)) in placed.iter().zip(&sizes) {
            prop_assert!(bounds.contains(r));
            prop_assert_eq!((r.width(), r.height()), (i64::from(w), i64::from(h)));
        }

        let total: i64 = placed.iter().map(PixelRect::area).sum();
        prop_assert!(bounds.area() >= total);
    }

    /// Free space never overlaps a placement.
    #[test]
    fn free_space_is_really_free(sizes in arb_sizes()) {
        let mut packer = GuillotinePacker::new();
        let placed: Vec<PixelRect> = sizes.iter().map(|&(w, h)| packer.insert(w, h)).collect();

        for f in packer.free_rects() {
            prop_assert!(packer.bounds().contains(f));
            prop_assert!(placed.iter().all(|r| !f.overlaps(r)));
        }
        prop_assert!(disjoint(packer.free_rects()));
    }

    /// Regions in a packed atlas are disjoint and every uv ends up inside
    /// the atlas.
    #[test]
    fn packed_atlas_is_consistent(mesh in arb_islands(), padding in 0u32..4) {
        let mut surface = build_topology(&mesh).unwrap();
        let source = RgbaImage::from_pixel(128, 128, Rgba([9, 9, 9, 255]));
        let params = AtlasParams::default().with_padding(padding);
        let atlas = pack_texture_atlas(&mut surface, &source, &params).unwrap();

        let placements: Vec<PixelRect> = atlas.rects.iter().map(|r| r.placement).collect();
        prop_assert!(disjoint(&placements));
        for r in &atlas.rects {
            prop_assert!(r.expanded.contains(&r.source));
            prop_assert_eq!(r.expanded.width(), r.placement.width());
            prop_assert_eq!(r.expanded.height(), r.placement.height());
        }
        for (_, v) in surface.live_vertices() {
            let uv = v.attributes.uv.unwrap();
            prop_assert!((0.0..=1.0).contains(&uv.x));
            prop_assert!((0.0..=1.0).contains(&uv.y));
        }
    }
}
