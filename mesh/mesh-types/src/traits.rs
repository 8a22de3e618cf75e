//! Traits shared by the indexed and half-edge mesh representations.

use crate::{Aabb, Triangle, Vertex};
use nalgebra::Point3;

/// Read-only view of a triangle mesh.
///
/// Implemented by [`IndexedMesh`](crate::IndexedMesh) directly; the
/// half-edge surface exposes the same counts through its own accessors.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of faces (triangles).
    fn face_count(&self) -> usize;

    /// A mesh without vertices or faces carries no geometry.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex by index, `None` when out of bounds.
    fn vertex(&self, index: usize) -> Option<&Vertex>;

    /// Vertex index triple of a face, `None` when out of bounds.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Triangle with resolved positions, `None` when the face or one of its
    /// vertices is out of bounds.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;

    /// Iterate over all vertices.
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;

    /// Iterate over all faces as vertex index triples.
    fn faces(&self) -> impl Iterator<Item = [u32; 3]>;

    /// Iterate over all resolvable triangles.
    fn triangles(&self) -> impl Iterator<Item = Triangle>;
}

/// Types that can report an axis-aligned bounding box.
pub trait MeshBounds {
    /// Bounding box of all geometry; empty when there is none.
    fn bounds(&self) -> Aabb;

    /// Bounding box, `None` when empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
