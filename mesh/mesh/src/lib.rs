//! Half-edge geometry kernel for level-of-detail tile sets.
//!
//! This umbrella crate re-exports all mesh-* crates, providing a unified API
//! for the steps an LOD tiler runs per tile: build topology, cut at tile
//! borders, simplify, skirt the borders and repack the texture atlas. All
//! crates are Layer 0 (zero Bevy dependencies) and can be used in CLI tools,
//! WASM, servers, or Python bindings.
//!
//! # Quick Start
//!
//! ```
//! use mesh::prelude::*;
//!
//! // Build an editable surface from a triangle soup
//! let mut surface = build_topology(&grid_plane(8, 8.0, 0.0)).unwrap();
//!
//! // Cut along a tile border and keep the lower half
//! cut_by_plane(&mut surface, Axis::X, 4.5, 1e-9);
//! let (mut tile, _) = split_by_plane(&surface, Axis::X, 4.5);
//!
//! // Simplify, then hang a skirt from the tile's borders
//! let bounds = tile.bounds();
//! let stats = decimate(&mut tile, &DecimateParams::for_geometric_error(0.1)).unwrap();
//! classify_tile_boundary(&mut tile, &bounds, 1e-9);
//! let skirt = make_skirt(&mut tile, &BoundaryClass::ALL, &SkirtParams::new(0.2)).unwrap();
//!
//! println!("{stats}\n{skirt}");
//! assert!(tile.validate().is_valid());
//! ```
//!
//! # Module Organization
//!
//! ## Foundation
//! - [`types`] - Triangle soups and geometry: `IndexedMesh`, `Vertex`, `Triangle`, `Aabb`, `Axis`
//! - [`halfedge`] - The editable half-edge `Surface` and its topology builder
//!
//! ## Editing
//! - [`repair`] - Vertex welding, degenerate and unreferenced element removal
//! - [`cut`] - Plane cuts, splitting into halves, tile border classification
//! - [`skirt`] - Skirts along tile borders
//!
//! ## Simplification
//! - [`decimate`] - Quality-gated edge-collapse decimation
//!
//! ## Texturing
//! - [`atlas`] - Texture atlas repacking
//!
//! # Feature Flags
//!
//! - `serde` - Serialize parameter and attribute types

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Triangle soups and geometry: `IndexedMesh`, `Vertex`, `Triangle`, `Aabb`.
pub use mesh_types as types;

/// The half-edge `Surface`, its elements and the topology builder.
pub use mesh_halfedge as halfedge;

/// Vertex welding and cleanup of degenerate or unreferenced elements.
pub use mesh_repair as repair;

/// Axis-aligned plane cuts and tile border classification.
pub use mesh_cut as cut;

/// Skirt extrusion along tile borders.
pub use mesh_skirt as skirt;

/// Quality-gated edge-collapse decimation.
pub use mesh_decimate as decimate;

/// Texture atlas repacking.
pub use mesh_atlas as atlas;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for LOD tile processing.
///
/// This module re-exports the most commonly used types, traits and
/// operations.
///
/// # Usage
///
/// ```
/// use mesh::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mesh_types::{
        Aabb, Axis, IndexedMesh, MeshBounds, MeshTopology, Triangle, Vertex, grid_plane, unit_cube,
    };

    // Topology
    pub use mesh_halfedge::{BoundaryClass, FaceKind, Surface, TwinMatch, build_topology};

    // Editing
    pub use mesh_cut::{classify_tile_boundary, cut_by_plane, split_by_plane};
    pub use mesh_repair::{RepairParams, WeldParams, repair_surface, weld_vertices};
    pub use mesh_skirt::{SkirtParams, make_skirt};

    // Simplification
    pub use mesh_decimate::{DecimateParams, decimate};

    // Texturing
    pub use mesh_atlas::{AtlasParams, pack_texture_atlas};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let mesh = IndexedMesh::new();
        assert_eq!(mesh.vertex_count(), 0);
        assert!(Surface::new().is_empty());
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::IndexedMesh::new();
        let _ = repair::RepairParams::default();
        let _ = cut::CutParams::new(types::Axis::Y, 0.0);
        let _ = skirt::SkirtParams::default();
        let _ = decimate::DecimateParams::default();
        let _ = atlas::AtlasParams::default();
        let _ = halfedge::Surface::new();
    }
}
