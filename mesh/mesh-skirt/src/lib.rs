//! Skirt extrusion for LOD tiles.
//!
//! Neighbouring tiles simplified to different levels of detail no longer
//! share their boundary vertices, so thin cracks open along the seams. A
//! skirt is a short wall hanging off each tagged tile side that hides them.
//!
//! The tile sides come from
//! [`BoundaryClass`](mesh_halfedge::BoundaryClass) ids on frontier
//! half-edges, usually set by `mesh_cut::classify_tile_boundary`.
//!
//! # Layer 0
//!
//! This is a Layer 0 crate with no rendering or I/O dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_cut::classify_tile_boundary;
//! use mesh_halfedge::{build_topology, BoundaryClass};
//! use mesh_skirt::{make_skirt, SkirtParams};
//! use mesh_types::{grid_plane, MeshBounds};
//!
//! let mut tile = build_topology(&grid_plane(4, 4.0, 0.0)).unwrap();
//! let bounds = tile.bounds();
//! classify_tile_boundary(&mut tile, &bounds, 1e-9);
//!
//! let summary = make_skirt(&mut tile, &BoundaryClass::ALL, &SkirtParams::new(0.5)).unwrap();
//! println!("{summary}");
//! assert_eq!(summary.faces_added, 32);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod error;
mod params;
mod result;
mod skirt;

pub use error::{SkirtError, SkirtResult};
pub use params::SkirtParams;
pub use result::SkirtSummary;
pub use skirt::make_skirt;
