//! The half-edge surface arena.

use std::cell::Cell;
use std::ops::{Index, IndexMut};

use mesh_types::{Aabb, MeshBounds, Point3, Triangle, Vector3, VertexAttributes};

use crate::element::{Face, FaceId, FaceKind, HalfEdge, HalfEdgeId, HeVertex, Status, VertexId};

/// An editable triangle surface in half-edge form.
///
/// Elements live in three arenas addressed by [`VertexId`], [`HalfEdgeId`]
/// and [`FaceId`]. Editing operations mark elements [`Status::Deleted`]
/// instead of removing them, so ids stay stable until
/// [`compact`](Self::compact) renumbers everything.
///
/// Indexing with an id (`surface[id]`) panics on an out-of-range id, like
/// slice indexing; the `vertex`/`half_edge`/`face` getters return `Option`.
///
/// # Example
///
/// ```
/// use mesh_halfedge::{FaceKind, Surface};
/// use mesh_types::{Point3, VertexAttributes};
///
/// let mut surface = Surface::new();
/// let a = surface.add_vertex(Point3::new(0.0, 0.0, 0.0), VertexAttributes::empty());
/// let b = surface.add_vertex(Point3::new(1.0, 0.0, 0.0), VertexAttributes::empty());
/// let c = surface.add_vertex(Point3::new(0.0, 1.0, 0.0), VertexAttributes::empty());
/// let f = surface.add_face([a, b, c], FaceKind::Normal);
///
/// assert_eq!(surface.face_vertices(f), [a, b, c]);
/// assert_eq!(surface.frontier_count(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Surface {
    pub(crate) vertices: Vec<HeVertex>,
    pub(crate) half_edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
    bounds: Cell<Option<Aabb>>,
}

impl Surface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty surface with room for the given element counts.
    #[must_use]
    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            half_edges: Vec::with_capacity(faces * 3),
            faces: Vec::with_capacity(faces),
            bounds: Cell::new(None),
        }
    }

    // =========================================================================
    // Arena access
    // =========================================================================

    /// All vertex slots, including tombstoned ones.
    #[must_use]
    pub fn vertices(&self) -> &[HeVertex] {
        &self.vertices
    }

    /// All half-edge slots, including tombstoned ones.
    #[must_use]
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// All face slots, including tombstoned ones.
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Vertex by id.
    #[must_use]
    pub fn vertex(&self, id: VertexId) -> Option<&HeVertex> {
        self.vertices.get(id.index())
    }

    /// Half-edge by id.
    #[must_use]
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.index())
    }

    /// Face by id.
    #[must_use]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.index())
    }

    /// Live vertices with their ids.
    pub fn live_vertices(&self) -> impl Iterator<Item = (VertexId, &HeVertex)> {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_live())
            .map(|(i, v)| (VertexId::from_index(i), v))
    }

    /// Live half-edges with their ids.
    pub fn live_half_edges(&self) -> impl Iterator<Item = (HalfEdgeId, &HalfEdge)> {
        self.half_edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_live())
            .map(|(i, e)| (HalfEdgeId::from_index(i), e))
    }

    /// Live faces with their ids.
    pub fn live_faces(&self) -> impl Iterator<Item = (FaceId, &Face)> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| f.is_live())
            .map(|(i, f)| (FaceId::from_index(i), f))
    }

    /// Number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_live()).count()
    }

    /// Number of live half-edges.
    #[must_use]
    pub fn half_edge_count(&self) -> usize {
        self.half_edges.iter().filter(|e| e.is_live()).count()
    }

    /// Number of live faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.iter().filter(|f| f.is_live()).count()
    }

    /// Number of live faces of the given kind.
    #[must_use]
    pub fn face_count_of(&self, kind: FaceKind) -> usize {
        self.faces
            .iter()
            .filter(|f| f.is_live() && f.kind == kind)
            .count()
    }

    /// Number of live half-edges without twin.
    #[must_use]
    pub fn frontier_count(&self) -> usize {
        self.half_edges
            .iter()
            .filter(|e| e.is_live() && e.is_frontier())
            .count()
    }

    /// True when the surface has no live face.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.faces.iter().any(Face::is_live)
    }

    // =========================================================================
    // Construction primitives
    // =========================================================================

    /// Append a live vertex.
    pub fn add_vertex(&mut self, position: Point3<f64>, attributes: VertexAttributes) -> VertexId {
        self.push_vertex(HeVertex::new(position, attributes))
    }

    /// Append a vertex record as-is.
    pub fn push_vertex(&mut self, vertex: HeVertex) -> VertexId {
        self.bounds.set(None);
        let id = VertexId::from_index(self.vertices.len());
        self.vertices.push(vertex);
        id
    }

    /// Append a triangle `a -> b -> c` with three fresh, twinless half-edges.
    ///
    /// Vertices without a live outgoing half-edge adopt the new one. The
    /// cached face normal is computed from the current positions.
    pub fn add_face(&mut self, [a, b, c]: [VertexId; 3], kind: FaceKind) -> FaceId {
        let face = FaceId::from_index(self.faces.len());
        let base = self.half_edges.len();
        let ids = [
            HalfEdgeId::from_index(base),
            HalfEdgeId::from_index(base + 1),
            HalfEdgeId::from_index(base + 2),
        ];

        for (k, origin) in [a, b, c].into_iter().enumerate() {
            self.half_edges.push(HalfEdge {
                origin,
                next: ids[(k + 1) % 3],
                twin: None,
                face,
                class_id: 0,
                status: Status::Live,
            });
            self.adopt_outgoing(origin, ids[k]);
        }

        let normal = Triangle::new(
            self[a].position,
            self[b].position,
            self[c].position,
        )
        .normal_or_up();

        self.faces.push(Face {
            half_edge: ids[0],
            kind,
            class_id: 0,
            status: Status::Live,
            normal,
        });
        face
    }

    /// Make `a` and `b` each other's twin, unlinking any previous partners.
    pub fn set_twins(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        self.unlink_twin(a);
        self.unlink_twin(b);
        self.half_edges[a.index()].twin = Some(b);
        self.half_edges[b.index()].twin = Some(a);
    }

    /// Clear the twin of `e` and the back-reference of its partner.
    pub fn unlink_twin(&mut self, e: HalfEdgeId) {
        if let Some(t) = self.half_edges[e.index()].twin.take() {
            if let Some(partner) = self.half_edges.get_mut(t.index()) {
                if partner.twin == Some(e) {
                    partner.twin = None;
                }
            }
        }
    }

    fn adopt_outgoing(&mut self, v: VertexId, e: HalfEdgeId) {
        let current = self.vertices[v.index()].outgoing;
        let usable = current.is_some_and(|h| {
            self.half_edges
                .get(h.index())
                .is_some_and(|he| he.is_live() && he.origin == v)
        });
        if !usable {
            self.vertices[v.index()].outgoing = Some(e);
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Vertex a half-edge points to (origin of its `next`).
    #[inline]
    #[must_use]
    pub fn end(&self, e: HalfEdgeId) -> VertexId {
        self.half_edges[self.half_edges[e.index()].next.index()].origin
    }

    /// Previous half-edge of the face cycle.
    #[inline]
    #[must_use]
    pub fn prev(&self, e: HalfEdgeId) -> HalfEdgeId {
        let next = self.half_edges[e.index()].next;
        self.half_edges[next.index()].next
    }

    /// The three half-edges of a face, starting at `face.half_edge`.
    #[must_use]
    pub fn face_half_edges(&self, f: FaceId) -> [HalfEdgeId; 3] {
        let h0 = self.faces[f.index()].half_edge;
        let h1 = self.half_edges[h0.index()].next;
        let h2 = self.half_edges[h1.index()].next;
        [h0, h1, h2]
    }

    /// The three corner vertices of a face in cycle order.
    #[must_use]
    pub fn face_vertices(&self, f: FaceId) -> [VertexId; 3] {
        self.face_half_edges(f)
            .map(|e| self.half_edges[e.index()].origin)
    }

    /// The face as a positioned triangle.
    #[must_use]
    pub fn face_triangle(&self, f: FaceId) -> Triangle {
        let [a, b, c] = self.face_vertices(f);
        Triangle::new(self[a].position, self[b].position, self[c].position)
    }

    /// Vector from the origin to the end of a half-edge.
    #[must_use]
    pub fn half_edge_vector(&self, e: HalfEdgeId) -> Vector3<f64> {
        let from = self.half_edges[e.index()].origin;
        self[self.end(e)].position - self[from].position
    }

    /// Squared length of a half-edge.
    #[must_use]
    pub fn half_edge_length_sq(&self, e: HalfEdgeId) -> f64 {
        self.half_edge_vector(e).norm_squared()
    }

    /// A face is degenerate when two corners are the same vertex or sit at
    /// bit-identical positions.
    #[must_use]
    pub fn is_face_degenerate(&self, f: FaceId) -> bool {
        let [a, b, c] = self.face_vertices(f);
        if a == b || b == c || c == a {
            return true;
        }
        let (pa, pb, pc) = (self[a].position, self[b].position, self[c].position);
        pa == pb || pb == pc || pc == pa
    }

    /// Total area of live faces.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.live_faces()
            .map(|(f, _)| self.face_triangle(f).area())
            .sum()
    }

    /// Total area of live faces of the given kind.
    #[must_use]
    pub fn area_of(&self, kind: FaceKind) -> f64 {
        self.live_faces()
            .filter(|(_, face)| face.kind == kind)
            .map(|(f, _)| self.face_triangle(f).area())
            .sum()
    }

    // =========================================================================
    // Tombstoning
    // =========================================================================

    /// Mark a face and its half-edges deleted and unlink their twins.
    ///
    /// Vertices are left alone; use `remove_unreferenced_vertices` from
    /// `mesh-repair` or [`compact`](Self::compact) afterwards.
    pub fn tombstone_face(&mut self, f: FaceId) {
        if !self.faces[f.index()].is_live() {
            return;
        }
        for e in self.face_half_edges(f) {
            self.unlink_twin(e);
            self.half_edges[e.index()].status = Status::Deleted;
        }
        self.faces[f.index()].status = Status::Deleted;
    }

    /// Mark a vertex deleted.
    pub fn tombstone_vertex(&mut self, v: VertexId) {
        self.bounds.set(None);
        let vertex = &mut self.vertices[v.index()];
        vertex.status = Status::Deleted;
        vertex.outgoing = None;
    }

    /// Re-choose the outgoing half-edge of every live vertex whose current
    /// one is missing, dead, or starts elsewhere.
    ///
    /// Vertices that start no live half-edge end up with `None`.
    pub fn refresh_outgoing(&mut self) {
        let mut first: Vec<Option<HalfEdgeId>> = vec![None; self.vertices.len()];
        for (i, e) in self.half_edges.iter().enumerate() {
            if e.is_live() {
                let slot = &mut first[e.origin.index()];
                if slot.is_none() {
                    *slot = Some(HalfEdgeId::from_index(i));
                }
            }
        }

        for (i, vertex) in self.vertices.iter_mut().enumerate() {
            let v = VertexId::from_index(i);
            let valid = vertex.outgoing.is_some_and(|h| {
                self.half_edges
                    .get(h.index())
                    .is_some_and(|he| he.is_live() && he.origin == v)
            });
            if !valid {
                vertex.outgoing = first[i];
            }
        }
    }

    /// Drop the cached bounding box.
    pub fn invalidate_bounds(&self) {
        self.bounds.set(None);
    }
}

impl MeshBounds for Surface {
    /// Bounds of live vertices, cached until the next mutable vertex access.
    fn bounds(&self) -> Aabb {
        if let Some(cached) = self.bounds.get() {
            return cached;
        }
        let computed = Aabb::from_points(self.live_vertices().map(|(_, v)| &v.position));
        self.bounds.set(Some(computed));
        computed
    }
}

impl Index<VertexId> for Surface {
    type Output = HeVertex;

    fn index(&self, id: VertexId) -> &HeVertex {
        &self.vertices[id.index()]
    }
}

impl IndexMut<VertexId> for Surface {
    fn index_mut(&mut self, id: VertexId) -> &mut HeVertex {
        self.bounds.set(None);
        &mut self.vertices[id.index()]
    }
}

impl Index<HalfEdgeId> for Surface {
    type Output = HalfEdge;

    fn index(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.half_edges[id.index()]
    }
}

impl IndexMut<HalfEdgeId> for Surface {
    fn index_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.half_edges[id.index()]
    }
}

impl Index<FaceId> for Surface {
    type Output = Face;

    fn index(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }
}

impl IndexMut<FaceId> for Surface {
    fn index_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> (Surface, [FaceId; 2]) {
        let mut s = Surface::new();
        let ids: Vec<_> = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]
            .iter()
            .map(|&[x, y]| s.add_vertex(Point3::new(x, y, 0.0), VertexAttributes::empty()))
            .collect();
        let f0 = s.add_face([ids[0], ids[1], ids[2]], FaceKind::Normal);
        let f1 = s.add_face([ids[0], ids[2], ids[3]], FaceKind::Normal);
        // Shared diagonal: 0->2 in f1, 2->0 in f0
        let [_, _, e20] = s.face_half_edges(f0);
        let [e02, _, _] = s.face_half_edges(f1);
        s.set_twins(e20, e02);
        (s, [f0, f1])
    }

    #[test]
    fn navigation_follows_cycle() {
        let (s, [f0, _]) = quad();
        let [h0, h1, h2] = s.face_half_edges(f0);
        assert_eq!(s[h0].next, h1);
        assert_eq!(s.prev(h0), h2);
        assert_eq!(s.end(h0), s[h1].origin);
        assert!((s.half_edge_length_sq(h0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn counts_and_area() {
        let (s, _) = quad();
        assert_eq!(s.vertex_count(), 4);
        assert_eq!(s.face_count(), 2);
        assert_eq!(s.half_edge_count(), 6);
        assert_eq!(s.frontier_count(), 4);
        assert!((s.area() - 1.0).abs() < 1e-12);
        assert!((s[FaceId(0)].normal.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn tombstone_face_unlinks_twins() {
        let (mut s, [f0, f1]) = quad();
        s.tombstone_face(f0);
        assert_eq!(s.face_count(), 1);
        assert_eq!(s.half_edge_count(), 3);
        assert!(s.face_half_edges(f1).iter().all(|&e| s[e].twin.is_none()));
        // Idempotent
        s.tombstone_face(f0);
        assert_eq!(s.face_count(), 1);
    }

    #[test]
    fn bounds_cache_invalidated_on_vertex_write() {
        let (mut s, _) = quad();
        assert!((s.bounds().max.x - 1.0).abs() < 1e-12);
        s[VertexId(1)].position.x = 5.0;
        assert!((s.bounds().max.x - 5.0).abs() < 1e-12);
    }

    #[test]
    fn refresh_outgoing_after_tombstone() {
        let (mut s, [f0, _]) = quad();
        s.tombstone_face(f0);
        s.refresh_outgoing();
        // Vertex 1 only belonged to f0
        assert_eq!(s[VertexId(1)].outgoing, None);
        let out = s[VertexId(0)].outgoing;
        assert!(out.is_some_and(|e| s[e].is_live() && s[e].origin == VertexId(0)));
    }

    #[test]
    fn degenerate_detection() {
        let mut s = Surface::new();
        let a = s.add_vertex(Point3::new(0.0, 0.0, 0.0), VertexAttributes::empty());
        let b = s.add_vertex(Point3::new(0.0, 0.0, 0.0), VertexAttributes::empty());
        let c = s.add_vertex(Point3::new(1.0, 0.0, 0.0), VertexAttributes::empty());
        let f = s.add_face([a, b, c], FaceKind::Normal);
        let g = s.add_face([a, a, c], FaceKind::Normal);
        assert!(s.is_face_degenerate(f));
        assert!(s.is_face_degenerate(g));
        assert!((s[f].normal.z - 1.0).abs() < 1e-12);
    }
}
