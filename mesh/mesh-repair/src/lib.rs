//! Cleanup operations for half-edge surfaces.
//!
//! This crate provides tools for:
//! - Vertex welding (merge coincident vertices with matching attributes)
//! - Degenerate and collapsed face removal
//! - Unreferenced vertex removal
//!
//! All operations tombstone in place; [`repair_surface`] chains them and
//! finishes with [`Surface::compact`](mesh_halfedge::Surface::compact).
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no rendering or I/O dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_halfedge::build_topology;
//! use mesh_repair::{repair_surface, RepairParams};
//! use mesh_types::grid_plane;
//!
//! // An exporter wrote every triangle with its own corners
//! let soup = grid_plane(4, 4.0, 0.0).to_soup();
//! let mut surface = build_topology(&soup).unwrap();
//! assert_eq!(surface.vertex_count(), 96);
//!
//! let summary = repair_surface(&mut surface, &RepairParams::for_soup_import());
//! println!("{summary}");
//! assert_eq!(surface.vertex_count(), 25);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod repair;
mod weld;

pub use error::{RepairError, RepairResult};
pub use repair::{
    RepairParams, RepairSummary, remove_collapsed_faces, remove_degenerate_faces,
    remove_unreferenced_vertices, repair_surface,
};
pub use weld::{AttributeMatch, WeldParams, weld_vertices};
