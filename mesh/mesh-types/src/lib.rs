//! Core mesh types for the LOD tiling kernel.
//!
//! This crate provides the triangle-soup side of the pipeline, the shape
//! meshes arrive in from loaders and leave in towards serializers:
//!
//! - [`Vertex`] - A point in 3D space with optional attributes
//! - [`VertexAttributes`] - Normal, texture coordinate, color and batch id
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//! - [`Axis`] - Coordinate axis used by tile-boundary planes
//!
//! The editable half-edge representation lives in `mesh-halfedge`.
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`. Tile
//! boundaries are expressed in the same units as vertex positions.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** with Z up:
//! - X: west (min) to east (max)
//! - Y: south (min) to north (max)
//! - Z: height
//!
//! Face winding is **counter-clockwise (CCW) when viewed from outside**.
//!
//! # Example
//!
//! ```
//! use mesh_types::{Vertex, IndexedMesh, Point3, MeshTopology};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::new(Point3::new(0.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(1.0, 0.0, 0.0)));
//! mesh.vertices.push(Vertex::new(Point3::new(0.5, 1.0, 0.0)));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!(!mesh.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

mod axis;
mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use axis::Axis;
pub use bounds::Aabb;
pub use mesh::{grid_plane, unit_cube, IndexedMesh};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::{Vertex, VertexAttributes, VertexColor};

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector3};
