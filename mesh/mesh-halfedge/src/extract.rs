//! Sub-surface extraction and export back to an indexed mesh.

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Vertex};

use crate::element::{Face, FaceId, HalfEdgeId, HeVertex, VertexId};
use crate::surface::Surface;

impl Surface {
    /// Copy the live faces accepted by `keep` into a new surface.
    ///
    /// Vertices are copied on first use (attributes and classification
    /// included); face kind and classification are preserved. A twin pair
    /// survives only if both of its faces are kept, otherwise the copied
    /// half-edge becomes frontier.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_halfedge::build_topology;
    /// use mesh_types::grid_plane;
    ///
    /// let surface = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
    /// let west = surface.extract(|f, _| surface.face_triangle(f).centroid().x < 1.0);
    ///
    /// assert_eq!(west.face_count(), 4);
    /// assert!(west.validate().is_valid());
    /// ```
    #[must_use]
    pub fn extract(&self, mut keep: impl FnMut(FaceId, &Face) -> bool) -> Self {
        let mut out = Self::new();
        let mut vertex_map: HashMap<VertexId, VertexId> = HashMap::new();
        let mut half_edge_map: HashMap<HalfEdgeId, HalfEdgeId> = HashMap::new();

        for (f, face) in self.live_faces() {
            if !keep(f, face) {
                continue;
            }
            let corners = self.face_vertices(f).map(|v| {
                *vertex_map.entry(v).or_insert_with(|| {
                    let src = &self[v];
                    out.push_vertex(HeVertex {
                        outgoing: None,
                        ..src.clone()
                    })
                })
            });

            let new_face = out.add_face(corners, face.kind);
            out[new_face].class_id = face.class_id;
            out[new_face].normal = face.normal;

            for (old, new) in self.face_half_edges(f).into_iter().zip(out.face_half_edges(new_face)) {
                out[new].class_id = self[old].class_id;
                half_edge_map.insert(old, new);
            }
        }

        for (&old, &new) in &half_edge_map {
            if let Some(twin) = self[old].twin.and_then(|t| half_edge_map.get(&t)) {
                out[new].twin = Some(*twin);
            }
        }

        out
    }

    /// Export live faces as an indexed mesh.
    ///
    /// Only vertices referenced by a live face are written, renumbered in
    /// arena order. Skirt faces are exported like any other face.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_halfedge::build_topology;
    /// use mesh_types::{unit_cube, MeshTopology};
    ///
    /// let mesh = build_topology(&unit_cube()).unwrap().to_indexed_mesh();
    /// assert_eq!(mesh.vertex_count(), 8);
    /// assert_eq!(mesh.face_count(), 12);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation is acceptable: surfaces address vertices with u32 ids
    pub fn to_indexed_mesh(&self) -> IndexedMesh {
        let mut used = vec![false; self.vertices.len()];
        for (f, _) in self.live_faces() {
            for v in self.face_vertices(f) {
                used[v.index()] = true;
            }
        }

        let mut remap = vec![u32::MAX; self.vertices.len()];
        let mut mesh = IndexedMesh::with_capacity(self.vertices.len(), self.faces.len());
        for (i, vertex) in self.vertices.iter().enumerate() {
            if used[i] {
                remap[i] = mesh.vertices.len() as u32;
                mesh.vertices.push(Vertex {
                    position: vertex.position,
                    attributes: vertex.attributes.clone(),
                });
            }
        }

        for (f, _) in self.live_faces() {
            mesh.faces.push(self.face_vertices(f).map(|v| remap[v.index()]));
        }

        mesh
    }
}
