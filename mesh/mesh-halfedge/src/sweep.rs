//! Per-sweep adjacency snapshot.

use crate::element::{FaceId, HalfEdgeId, VertexId};
use crate::position::PositionIndex;
use crate::surface::Surface;

/// Adjacency maps built once per editing sweep.
///
/// Holds vertex → outgoing half-edges, face → half-edges, and
/// vertex → exact-position group. Vertices that share a position (seams
/// where texture coordinates or batch ids differ) form one group and are
/// moved together by collapse operations.
///
/// The index is a snapshot: callers that rewrite origins during a sweep
/// keep it current with [`push_outgoing`](Self::push_outgoing).
#[derive(Debug, Clone)]
pub struct SweepIndex {
    outgoing: Vec<Vec<HalfEdgeId>>,
    face_edges: Vec<[HalfEdgeId; 3]>,
    group_of: Vec<u32>,
    members: Vec<Vec<VertexId>>,
}

impl SweepIndex {
    /// Snapshot the live adjacency of `surface`.
    #[must_use]
    pub fn build(surface: &Surface) -> Self {
        let vertex_slots = surface.vertices().len();

        let mut outgoing = vec![Vec::new(); vertex_slots];
        for (e, he) in surface.live_half_edges() {
            outgoing[he.origin.index()].push(e);
        }

        let face_edges = (0..surface.faces().len())
            .map(|i| {
                let f = FaceId::from_index(i);
                if surface[f].is_live() {
                    surface.face_half_edges(f)
                } else {
                    [surface[f].half_edge; 3]
                }
            })
            .collect();

        let positions: Vec<_> = surface.vertices().iter().map(|v| v.position).collect();
        let group_of = PositionIndex::group(&positions, 0.0);

        let mut members = vec![Vec::new(); vertex_slots];
        for (i, &rep) in group_of.iter().enumerate() {
            if surface.vertices()[i].is_live() {
                members[rep as usize].push(VertexId::from_index(i));
            }
        }

        Self {
            outgoing,
            face_edges,
            group_of,
            members,
        }
    }

    /// Half-edges starting at `v`, as of the snapshot plus later pushes.
    #[must_use]
    pub fn outgoing(&self, v: VertexId) -> &[HalfEdgeId] {
        self.outgoing.get(v.index()).map_or(&[], Vec::as_slice)
    }

    /// Record that `e` now starts at `v`.
    pub fn push_outgoing(&mut self, v: VertexId, e: HalfEdgeId) {
        if let Some(list) = self.outgoing.get_mut(v.index()) {
            list.push(e);
        }
    }

    /// Half-edges of `f` at snapshot time.
    #[must_use]
    pub fn face_half_edges(&self, f: FaceId) -> [HalfEdgeId; 3] {
        self.face_edges[f.index()]
    }

    /// Position group id of `v` (the lowest vertex id at that position).
    #[must_use]
    pub fn group(&self, v: VertexId) -> u32 {
        self.group_of.get(v.index()).copied().unwrap_or(v.0)
    }

    /// True when `a` and `b` sit at the same position.
    #[must_use]
    pub fn same_group(&self, a: VertexId, b: VertexId) -> bool {
        self.group(a) == self.group(b)
    }

    /// Live vertices sharing `v`'s position, `v` included.
    #[must_use]
    pub fn group_members(&self, v: VertexId) -> &[VertexId] {
        self.members
            .get(self.group(v) as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Outgoing half-edges of every vertex in `v`'s position group.
    pub fn group_outgoing(&self, v: VertexId) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.group_members(v)
            .iter()
            .flat_map(|&m| self.outgoing(m).iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_topology, build_topology_with, TwinMatch};
    use mesh_types::{grid_plane, unit_cube};

    #[test]
    fn outgoing_counts_match_valence() {
        let s = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
        let index = SweepIndex::build(&s);
        // Center vertex of a 2x2 grid has six incident triangles
        assert_eq!(index.outgoing(VertexId(4)).len(), 6);
        assert_eq!(index.outgoing(VertexId(0)).len(), 2);
    }

    #[test]
    fn soup_vertices_group_by_position() {
        let soup = unit_cube().to_soup();
        let s = build_topology_with(&soup, TwinMatch::Identity).unwrap();
        let index = SweepIndex::build(&s);
        // Cube corner (0,0,0) appears in six triangles of the soup
        let corner = s
            .live_vertices()
            .find(|(_, v)| v.position == mesh_types::Point3::new(0.0, 0.0, 0.0))
            .map(|(id, _)| id)
            .unwrap();
        assert_eq!(index.group_members(corner).len(), 6);
        assert_eq!(index.group_outgoing(corner).count(), 6);
    }

    #[test]
    fn face_edges_snapshot() {
        let s = build_topology(&unit_cube()).unwrap();
        let index = SweepIndex::build(&s);
        assert_eq!(index.face_half_edges(FaceId(4)), s.face_half_edges(FaceId(4)));
    }
}
