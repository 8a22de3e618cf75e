//! Axis-aligned plane cutting for half-edge surfaces.
//!
//! Tiles are cut out of a larger model along axis-aligned planes. This crate
//! provides the pieces of that step:
//!
//! - **Edge split**: [`split_edge`] replaces the faces on both sides of an
//!   edge with two triangles each, keeping every adjacency
//! - **Plane cut**: [`cut_by_plane`] / [`cut_surface`] split every edge that
//!   strictly crosses a plane, snapping the new vertices onto it
//! - **Partition**: [`split_by_plane`] copies the faces on each side into
//!   two new surfaces
//! - **Tile sides**: [`classify_tile_boundary`] tags frontier edges lying on
//!   the tile bounds so skirts can be grown from them
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no rendering or I/O dependencies.
//!
//! # Example
//!
//! ```
//! use mesh_cut::{classify_tile_boundary, cut_by_plane, split_by_plane};
//! use mesh_halfedge::build_topology;
//! use mesh_types::{grid_plane, Aabb, Axis, Point3};
//!
//! let mut surface = build_topology(&grid_plane(4, 4.0, 0.0)).unwrap();
//!
//! // Cut out the tile x < 2.5
//! cut_by_plane(&mut surface, Axis::X, 2.5, 1e-9);
//! let (mut tile, _rest) = split_by_plane(&surface, Axis::X, 2.5);
//!
//! let bounds = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.5, 4.0, 0.0));
//! let tagged = classify_tile_boundary(&mut tile, &bounds, 1e-9);
//! assert!(tagged > 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod classify;
mod cut;
mod error;
mod params;
mod partition;
mod result;
mod split;

pub use classify::classify_tile_boundary;
pub use cut::{cut_by_plane, cut_surface};
pub use error::{CutError, CutResult};
pub use params::CutParams;
pub use partition::split_by_plane;
pub use result::CutSummary;
pub use split::split_edge;
