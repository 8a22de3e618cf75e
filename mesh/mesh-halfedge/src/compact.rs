//! Compaction: drop tombstoned elements and renumber.

use tracing::{debug, warn};

use crate::element::{FaceId, HalfEdgeId, Status, VertexId};
use crate::surface::Surface;

/// Old-to-new id mapping produced by [`Surface::compact`].
///
/// Dropped elements map to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactionMap {
    /// New id per old vertex slot.
    pub vertices: Vec<Option<VertexId>>,
    /// New id per old half-edge slot.
    pub half_edges: Vec<Option<HalfEdgeId>>,
    /// New id per old face slot.
    pub faces: Vec<Option<FaceId>>,
}

impl CompactionMap {
    /// New id of an old vertex.
    #[must_use]
    pub fn vertex(&self, old: VertexId) -> Option<VertexId> {
        self.vertices.get(old.index()).copied().flatten()
    }

    /// New id of an old half-edge.
    #[must_use]
    pub fn half_edge(&self, old: HalfEdgeId) -> Option<HalfEdgeId> {
        self.half_edges.get(old.index()).copied().flatten()
    }

    /// New id of an old face.
    #[must_use]
    pub fn face(&self, old: FaceId) -> Option<FaceId> {
        self.faces.get(old.index()).copied().flatten()
    }

    /// Number of elements dropped across all arenas.
    #[must_use]
    pub fn dropped(&self) -> usize {
        self.vertices.iter().filter(|v| v.is_none()).count()
            + self.half_edges.iter().filter(|e| e.is_none()).count()
            + self.faces.iter().filter(|f| f.is_none()).count()
    }
}

fn remap<T: Copy>(map: &[Option<T>], index: usize) -> Option<T> {
    map.get(index).copied().flatten()
}

impl Surface {
    /// Remove tombstoned elements and renumber the arenas densely.
    ///
    /// Liveness is closed first:
    /// 1. a live half-edge starting at a dead vertex dies,
    /// 2. a live face with a dead half-edge dies,
    /// 3. half-edges of dead faces die.
    ///
    /// References to dropped elements are broken rather than left dangling:
    /// twins become `None`, and outgoing half-edges are re-chosen among the
    /// surviving ones (or `None`). Unreferenced live vertices are kept.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_halfedge::{build_topology, FaceId};
    /// use mesh_types::unit_cube;
    ///
    /// let mut surface = build_topology(&unit_cube()).unwrap();
    /// surface.tombstone_face(FaceId(0));
    /// let map = surface.compact();
    ///
    /// assert_eq!(map.face(FaceId(0)), None);
    /// assert_eq!(map.face(FaceId(1)), Some(FaceId(0)));
    /// assert_eq!(surface.faces().len(), 11);
    /// assert!(surface.validate().is_valid());
    /// ```
    pub fn compact(&mut self) -> CompactionMap {
        self.close_liveness();

        let vertex_map = dense_map(self.vertices.iter().map(|v| v.status), VertexId::from_index);
        let half_edge_map = dense_map(self.half_edges.iter().map(|e| e.status), HalfEdgeId::from_index);
        let face_map = dense_map(self.faces.iter().map(|f| f.status), FaceId::from_index);

        let old_vertices = std::mem::take(&mut self.vertices);
        let old_half_edges = std::mem::take(&mut self.half_edges);
        let old_faces = std::mem::take(&mut self.faces);

        self.vertices = old_vertices
            .into_iter()
            .filter(|v| v.is_live())
            .map(|mut v| {
                v.outgoing = v.outgoing.and_then(|e| remap(&half_edge_map, e.index()));
                v
            })
            .collect();

        self.half_edges = old_half_edges
            .into_iter()
            .filter(|e| e.is_live())
            .filter_map(|mut e| {
                e.origin = remap(&vertex_map, e.origin.index())?;
                e.next = remap(&half_edge_map, e.next.index())?;
                e.face = remap(&face_map, e.face.index())?;
                e.twin = e.twin.and_then(|t| remap(&half_edge_map, t.index()));
                Some(e)
            })
            .collect();

        self.faces = old_faces
            .into_iter()
            .filter(|f| f.is_live())
            .filter_map(|mut f| {
                f.half_edge = remap(&half_edge_map, f.half_edge.index())?;
                Some(f)
            })
            .collect();

        // Twins of surviving half-edges whose partner was dropped
        for i in 0..self.half_edges.len() {
            if let Some(t) = self.half_edges[i].twin {
                let back = self.half_edges.get(t.index()).and_then(|p| p.twin);
                if back != Some(HalfEdgeId::from_index(i)) {
                    self.half_edges[i].twin = None;
                }
            }
        }

        self.refresh_outgoing();
        self.invalidate_bounds();

        let map = CompactionMap {
            vertices: vertex_map,
            half_edges: half_edge_map,
            faces: face_map,
        };
        debug!(
            dropped = map.dropped(),
            vertices = self.vertices.len(),
            faces = self.faces.len(),
            "Compacted surface"
        );
        map
    }

    fn close_liveness(&mut self) {
        let mut orphaned = 0usize;
        for i in 0..self.half_edges.len() {
            let he = &self.half_edges[i];
            if !he.is_live() {
                continue;
            }
            let origin_live = self.vertices.get(he.origin.index()).is_some_and(|v| v.is_live());
            let next_ok = he.next.index() < self.half_edges.len();
            let face_ok = he.face.index() < self.faces.len();
            if !origin_live || !next_ok || !face_ok {
                orphaned += 1;
                self.half_edges[i].status = Status::Deleted;
            }
        }

        for i in 0..self.faces.len() {
            if !self.faces[i].is_live() {
                continue;
            }
            let f = FaceId::from_index(i);
            let intact = self.face_cycle(f).is_some_and(|cycle| {
                cycle.iter().all(|e| self.half_edges[e.index()].is_live())
            });
            if !intact {
                self.faces[i].status = Status::Deleted;
            }
        }

        for i in 0..self.half_edges.len() {
            let he = &self.half_edges[i];
            if he.is_live() && !self.faces[he.face.index()].is_live() {
                self.half_edges[i].status = Status::Deleted;
            }
        }

        if orphaned > 0 {
            warn!(orphaned, "Dropped half-edges with dangling references");
        }
    }

    /// Face cycle with bounds checks, `None` when a reference is out of range.
    pub(crate) fn face_cycle(&self, f: FaceId) -> Option<[HalfEdgeId; 3]> {
        let h0 = self.faces.get(f.index())?.half_edge;
        let h1 = self.half_edges.get(h0.index())?.next;
        let h2 = self.half_edges.get(h1.index())?.next;
        self.half_edges.get(h2.index())?;
        Some([h0, h1, h2])
    }
}

fn dense_map<T>(statuses: impl Iterator<Item = Status>, make: impl Fn(usize) -> T) -> Vec<Option<T>> {
    let mut next = 0usize;
    statuses
        .map(|status| {
            status.is_live().then(|| {
                let id = make(next);
                next += 1;
                id
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{build_topology, FaceId, VertexId};
    use mesh_types::{grid_plane, unit_cube};

    #[test]
    fn compact_without_tombstones_is_identity() {
        let mut s = build_topology(&unit_cube()).unwrap();
        let map = s.compact();
        assert_eq!(map.dropped(), 0);
        assert_eq!(map.vertex(VertexId(5)), Some(VertexId(5)));
        assert_eq!(s.faces().len(), 12);
    }

    #[test]
    fn dead_vertex_kills_its_faces() {
        let mut s = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
        // Vertex 1 is only used by face 0 of the single quad
        s.tombstone_vertex(VertexId(1));
        let map = s.compact();
        assert_eq!(map.face(FaceId(0)), None);
        assert_eq!(s.faces().len(), 1);
        assert_eq!(s.vertices().len(), 3);
        assert_eq!(s.frontier_count(), 3);
        assert!(s.validate().is_valid());
    }

    #[test]
    fn unreferenced_live_vertices_survive() {
        let mut s = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
        s.tombstone_face(FaceId(0));
        s.compact();
        assert_eq!(s.vertices().len(), 4);
        assert_eq!(s.vertices()[1].outgoing, None);
    }

    #[test]
    fn twins_to_dropped_half_edges_are_cleared() {
        let mut s = build_topology(&unit_cube()).unwrap();
        s.tombstone_face(FaceId(3));
        s.compact();
        assert_eq!(s.frontier_count(), 3);
        assert!(s.validate().is_valid());
    }
}
