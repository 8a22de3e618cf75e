//! Face and vertex normal recomputation.

use mesh_types::Vector3;

use crate::surface::Surface;

impl Surface {
    /// Recompute the cached plane normal of every live face.
    ///
    /// Degenerate faces get the vertical fallback `(0, 0, 1)`.
    pub fn recompute_face_normals(&mut self) {
        for i in 0..self.faces.len() {
            if !self.faces[i].is_live() {
                continue;
            }
            let f = crate::FaceId::from_index(i);
            self.faces[i].normal = self.face_triangle(f).normal_or_up();
        }
    }

    /// Set every live vertex normal to the area-weighted average of its
    /// live faces' normals.
    ///
    /// Vertices whose sum vanishes (no faces, or opposing faces) get the
    /// vertical fallback.
    pub fn recompute_vertex_normals(&mut self) {
        let mut sums = vec![Vector3::zeros(); self.vertices.len()];

        for (f, _) in self.live_faces() {
            // Cross product magnitude is twice the area: free area weighting
            let weighted = self.face_triangle(f).normal_unnormalized();
            for v in self.face_vertices(f) {
                sums[v.index()] += weighted;
            }
        }

        for (vertex, sum) in self.vertices.iter_mut().zip(sums) {
            if vertex.is_live() {
                let normal = sum.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
                vertex.attributes.normal = Some(normal);
            }
        }
    }
}
