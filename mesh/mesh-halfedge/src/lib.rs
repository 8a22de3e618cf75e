//! Half-edge surface for LOD mesh editing.
//!
//! This crate holds the editable representation every simplification and
//! tiling step works on:
//!
//! - [`Surface`] - Arenas of vertices, half-edges and faces addressed by
//!   stable `u32` ids ([`VertexId`], [`HalfEdgeId`], [`FaceId`])
//! - [`build_topology`] / [`build_topology_with`] - Construction from an
//!   [`IndexedMesh`](mesh_types::IndexedMesh), with twins paired by vertex
//!   identity or by position ([`TwinMatch`])
//! - [`Surface::compact`] - Drop tombstoned elements and renumber
//! - [`Surface::validate`] - Structural checks ([`TopologyReport`])
//! - [`SweepIndex`] - Adjacency snapshot used by edit sweeps
//!
//! # Layer 0 Crate
//!
//! Depends only on `mesh-types`; no rendering or I/O.
//!
//! # Mutation model
//!
//! Operations never remove elements in place. They mark them
//! [`Status::Deleted`] (tombstoning) and leave ids stable, so loops over a
//! snapshot of ids stay valid while the surface is edited. A final
//! [`Surface::compact`] drops the tombstones and returns a
//! [`CompactionMap`] from old to new ids.
//!
//! # Example
//!
//! ```
//! use mesh_halfedge::{build_topology, FaceId};
//! use mesh_types::unit_cube;
//!
//! let mut surface = build_topology(&unit_cube()).unwrap();
//! assert_eq!(surface.frontier_count(), 0);
//!
//! surface.tombstone_face(FaceId(0));
//! assert_eq!(surface.frontier_count(), 3);
//!
//! surface.compact();
//! assert!(surface.validate().is_valid());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
// Id conversions are checked once at construction time
#![allow(clippy::cast_possible_truncation)]

mod builder;
mod compact;
mod element;
mod error;
mod extract;
mod normals;
mod position;
mod surface;
mod sweep;
mod twins;
mod validate;

pub use builder::{build_topology, build_topology_with};
pub use compact::CompactionMap;
pub use element::{
    BoundaryClass, Face, FaceId, FaceKind, HalfEdge, HalfEdgeId, HeVertex, Status, UNCLASSIFIED,
    VertexId,
};
pub use error::{TopologyError, TopologyResult};
pub use position::{PositionIndex, TwinMatch};
pub use surface::Surface;
pub use sweep::SweepIndex;
pub use validate::{TopologyIssue, TopologyReport};
