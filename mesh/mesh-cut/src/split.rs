//! Edge splitting: the surgery every plane cut is built from.

use mesh_halfedge::{FaceId, FaceKind, HalfEdgeId, Surface, VertexId};
use mesh_types::{Axis, Point3};
use tracing::warn;

/// One face seen from the edge being split.
#[derive(Debug, Clone, Copy)]
struct Wing {
    face: FaceId,
    kind: FaceKind,
    face_class: u32,
    origin: VertexId,
    end: VertexId,
    apex: VertexId,
    edge_class: u32,
    next_class: u32,
    prev_class: u32,
    next_twin: Option<HalfEdgeId>,
    prev_twin: Option<HalfEdgeId>,
}

impl Wing {
    fn capture(surface: &Surface, e: HalfEdgeId) -> Self {
        let he = &surface[e];
        let next = he.next;
        let prev = surface.prev(e);
        let face = &surface[he.face];
        Self {
            face: he.face,
            kind: face.kind,
            face_class: face.class_id,
            origin: he.origin,
            end: surface[next].origin,
            apex: surface[prev].origin,
            edge_class: he.class_id,
            next_class: surface[next].class_id,
            prev_class: surface[prev].class_id,
            next_twin: surface[next].twin,
            prev_twin: surface[prev].twin,
        }
    }

    /// True when no exterior twin lives on one of the faces being replaced.
    fn exterior_is_separate(&self, surface: &Surface, replaced: &[FaceId]) -> bool {
        [self.next_twin, self.prev_twin]
            .into_iter()
            .flatten()
            .all(|t| {
                surface
                    .half_edge(t)
                    .is_some_and(|he| he.is_live() && !replaced.contains(&he.face))
            })
    }

    /// Replace the wing's face with `(origin, mid, apex)` and
    /// `(mid, end, apex)`, returning the two halves of the split edge.
    fn rebuild(&self, surface: &mut Surface, mid: VertexId) -> (HalfEdgeId, HalfEdgeId) {
        let first = surface.add_face([self.origin, mid, self.apex], self.kind);
        let second = surface.add_face([mid, self.end, self.apex], self.kind);
        surface[first].class_id = self.face_class;
        surface[second].class_id = self.face_class;

        let [f_edge, f_inner, f_prev] = surface.face_half_edges(first);
        let [s_edge, s_next, s_inner] = surface.face_half_edges(second);

        surface[f_edge].class_id = self.edge_class;
        surface[s_edge].class_id = self.edge_class;
        surface[f_prev].class_id = self.prev_class;
        surface[s_next].class_id = self.next_class;

        surface.set_twins(f_inner, s_inner);
        if let Some(t) = self.prev_twin {
            surface.set_twins(f_prev, t);
        }
        if let Some(t) = self.next_twin {
            surface.set_twins(s_next, t);
        }

        (f_edge, s_edge)
    }
}

/// Split half-edge `e` at parameter `t` (from its origin) and return the new
/// vertex.
///
/// The face of `e`, and the face of its twin if any, are each tombstoned and
/// replaced by two triangles sharing the new vertex. Exterior twins are
/// rewired to the new triangles, each new triangle pair gets an internal
/// twin pair along the new edge, and the two halves of the split edge are
/// paired across the cut. Face kinds and classification ids carry over.
///
/// When the twin side uses different vertices at the same positions (a
/// texture seam), a second vertex is created at the same point with the
/// twin side's interpolated attributes.
///
/// Returns `None` without touching the surface when `t` is not strictly
/// between 0 and 1, when `e` or its face is dead, or when its neighbourhood
/// is inconsistent (stale twin, faces folded onto each other).
///
/// # Example
///
/// ```
/// use mesh_cut::split_edge;
/// use mesh_halfedge::{build_topology, HalfEdgeId};
/// use mesh_types::grid_plane;
///
/// let mut surface = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
/// // Half-edge 3 is the shared diagonal of the two triangles
/// let mid = split_edge(&mut surface, HalfEdgeId(3), 0.5).unwrap();
///
/// assert_eq!(surface[mid].position.x, 0.5);
/// assert_eq!(surface.face_count(), 4);
/// assert!(surface.validate().is_valid());
/// ```
pub fn split_edge(surface: &mut Surface, e: HalfEdgeId, t: f64) -> Option<VertexId> {
    split_edge_at(surface, e, t, None)
}

/// [`split_edge`] with the new vertex optionally snapped onto an axis plane.
pub(crate) fn split_edge_at(
    surface: &mut Surface,
    e: HalfEdgeId,
    t: f64,
    snap: Option<(Axis, f64)>,
) -> Option<VertexId> {
    if !(t > 0.0 && t < 1.0) {
        return None;
    }
    let he = surface.half_edge(e)?;
    if !he.is_live() || !surface[he.face].is_live() {
        return None;
    }

    let twin = match he.twin {
        Some(t_id) => {
            let consistent = surface.half_edge(t_id).is_some_and(|th| {
                th.is_live() && th.twin == Some(e) && th.face != he.face && surface[th.face].is_live()
            });
            if !consistent {
                warn!(half_edge = %e, twin = %t_id, "Stale twin on split edge, skipping");
                return None;
            }
            Some(t_id)
        }
        None => None,
    };

    let wing = Wing::capture(surface, e);
    let twin_wing = twin.map(|t_id| Wing::capture(surface, t_id));

    let mut replaced = vec![wing.face];
    replaced.extend(twin_wing.map(|w| w.face));
    let separate = wing.exterior_is_separate(surface, &replaced)
        && twin_wing.is_none_or(|w| w.exterior_is_separate(surface, &replaced));
    if !separate {
        warn!(half_edge = %e, "Faces around split edge share more than one edge, skipping");
        return None;
    }

    let position = split_position(surface, wing.origin, wing.end, t, snap);
    let attributes = surface[wing.origin]
        .attributes
        .lerp(&surface[wing.end].attributes, t);
    let class_id = wing.edge_class;

    for f in &replaced {
        surface.tombstone_face(*f);
    }

    let mid = surface.add_vertex(position, attributes);
    surface[mid].class_id = class_id;
    let (first_half, second_half) = wing.rebuild(surface, mid);

    if let Some(tw) = twin_wing {
        // The twin runs end -> origin, so its parameter is mirrored
        let twin_mid = if tw.origin == wing.end && tw.end == wing.origin {
            mid
        } else {
            let attributes = surface[tw.origin]
                .attributes
                .lerp(&surface[tw.end].attributes, 1.0 - t);
            let v = surface.add_vertex(position, attributes);
            surface[v].class_id = tw.edge_class;
            v
        };
        let (twin_first, twin_second) = tw.rebuild(surface, twin_mid);
        surface.set_twins(first_half, twin_second);
        surface.set_twins(second_half, twin_first);
    }

    Some(mid)
}

fn split_position(
    surface: &Surface,
    a: VertexId,
    b: VertexId,
    t: f64,
    snap: Option<(Axis, f64)>,
) -> Point3<f64> {
    let pa = surface[a].position;
    let pb = surface[b].position;
    let mut p = Point3::from(pa.coords.lerp(&pb.coords, t));
    if let Some((axis, coordinate)) = snap {
        p[axis.index()] = coordinate;
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_halfedge::build_topology;
    use mesh_types::{IndexedMesh, Vertex, grid_plane};

    #[test]
    fn split_interior_edge() {
        let mut s = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
        let mid = split_edge(&mut s, HalfEdgeId(3), 0.5).unwrap();

        assert_eq!(s.face_count(), 4);
        assert_eq!(s.frontier_count(), 4);
        assert_relative_eq!(s.area(), 1.0, epsilon = 1e-12);
        assert_eq!(s[mid].position, Point3::new(0.5, 0.5, 0.0));
        assert!(s.validate().is_valid());
    }

    #[test]
    fn split_boundary_edge() {
        let mut s = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
        assert!(split_edge(&mut s, HalfEdgeId(0), 0.25).is_some());

        assert_eq!(s.face_count(), 3);
        assert_eq!(s.frontier_count(), 5);
        assert_relative_eq!(s.area(), 1.0, epsilon = 1e-12);
        assert!(s.validate().is_valid());
    }

    #[test]
    fn split_rejects_endpoints_and_dead_edges() {
        let mut s = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
        assert!(split_edge(&mut s, HalfEdgeId(0), 0.0).is_none());
        assert!(split_edge(&mut s, HalfEdgeId(0), 1.0).is_none());
        assert!(split_edge(&mut s, HalfEdgeId(0), f64::NAN).is_none());

        s.tombstone_face(FaceId(0));
        assert!(split_edge(&mut s, HalfEdgeId(0), 0.5).is_none());
        assert_eq!(s.face_count(), 1);
    }

    #[test]
    fn split_seam_creates_two_vertices() {
        // Shared diagonal duplicated with different texture coordinates
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0).with_uv(0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0).with_uv(1.0, 0.0),
                Vertex::from_coords(1.0, 1.0, 0.0).with_uv(1.0, 1.0),
                Vertex::from_coords(0.0, 0.0, 0.0).with_uv(0.0, 0.5),
                Vertex::from_coords(1.0, 1.0, 0.0).with_uv(1.0, 0.5),
                Vertex::from_coords(0.0, 1.0, 0.0).with_uv(0.0, 1.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        );
        let mut s = mesh_halfedge::build_topology_with(
            &mesh,
            mesh_halfedge::TwinMatch::Position { tolerance: 0.0 },
        )
        .unwrap();
        assert_eq!(s.frontier_count(), 4);

        // Face 0 diagonal runs 2 -> 0
        let before = s.vertices().len();
        let mid = split_edge(&mut s, HalfEdgeId(2), 0.5).unwrap();
        assert_eq!(s.vertices().len(), before + 2);

        let uv = s[mid].attributes.uv.unwrap();
        assert_relative_eq!(uv.x, 0.5);
        assert_relative_eq!(uv.y, 0.5);
        assert_eq!(s.frontier_count(), 4);
        assert!(s.validate().is_valid());
    }

    #[test]
    fn split_carries_classification() {
        let mut s = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
        s[HalfEdgeId(0)].class_id = 1;
        let mid = split_edge(&mut s, HalfEdgeId(0), 0.5).unwrap();
        assert_eq!(s[mid].class_id, 1);
        let tagged = s.live_half_edges().filter(|(_, he)| he.class_id == 1).count();
        assert_eq!(tagged, 2);
    }
}
