//! Topology construction from an indexed triangle mesh.

use mesh_types::IndexedMesh;
use tracing::info;

use crate::element::{FaceKind, VertexId};
use crate::error::{TopologyError, TopologyResult};
use crate::position::TwinMatch;
use crate::surface::Surface;

/// Build a half-edge surface, pairing twins by vertex identity.
///
/// One face and three half-edges are created per input triangle; vertex
/// attributes are copied unchanged. Empty input yields an empty surface.
///
/// # Errors
///
/// Returns [`TopologyError::InvalidIndex`] if a face references a vertex
/// that does not exist.
///
/// # Example
///
/// ```
/// use mesh_halfedge::build_topology;
/// use mesh_types::unit_cube;
///
/// let surface = build_topology(&unit_cube()).unwrap();
/// assert_eq!(surface.face_count(), 12);
/// assert_eq!(surface.frontier_count(), 0);
/// ```
pub fn build_topology(mesh: &IndexedMesh) -> TopologyResult<Surface> {
    build_topology_with(mesh, TwinMatch::Identity)
}

/// Build a half-edge surface with an explicit twin matching rule.
///
/// With [`TwinMatch::Position`], edges of triangles that do not share vertex
/// indices are still paired when their endpoints coincide, which is how
/// unwelded exporter output gets its connectivity back.
///
/// # Errors
///
/// - [`TopologyError::InvalidIndex`] for an out-of-range vertex index
/// - [`TopologyError::InvalidTolerance`] for a negative or non-finite tolerance
/// - [`TopologyError::TooLarge`] when ids would overflow `u32`
///
/// # Example
///
/// ```
/// use mesh_halfedge::{build_topology_with, TwinMatch};
/// use mesh_types::unit_cube;
///
/// let soup = unit_cube().to_soup();
/// let surface = build_topology_with(&soup, TwinMatch::Position { tolerance: 0.0 }).unwrap();
/// assert_eq!(surface.frontier_count(), 0);
/// ```
pub fn build_topology_with(mesh: &IndexedMesh, matching: TwinMatch) -> TopologyResult<Surface> {
    if let TwinMatch::Position { tolerance } = matching {
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(TopologyError::InvalidTolerance(tolerance));
        }
    }

    let vertex_count = mesh.vertices.len();
    if u32::try_from(vertex_count).is_err() {
        return Err(TopologyError::TooLarge {
            kind: "vertices",
            count: vertex_count,
        });
    }
    let half_edge_count = mesh.faces.len().saturating_mul(3);
    if u32::try_from(half_edge_count).is_err() {
        return Err(TopologyError::TooLarge {
            kind: "half-edges",
            count: half_edge_count,
        });
    }

    for (face, indices) in mesh.faces.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(TopologyError::InvalidIndex {
                face,
                index,
                vertex_count,
            });
        }
    }

    let mut surface = Surface::with_capacity(vertex_count, mesh.faces.len());
    for vertex in &mesh.vertices {
        surface.add_vertex(vertex.position, vertex.attributes.clone());
    }
    for face in &mesh.faces {
        surface.add_face(face.map(VertexId), FaceKind::Normal);
    }

    let pairs = surface.link_twins(matching);

    info!(
        vertices = vertex_count,
        faces = mesh.faces.len(),
        twin_pairs = pairs,
        frontier = surface.frontier_count(),
        "Built half-edge topology"
    );

    Ok(surface)
}
