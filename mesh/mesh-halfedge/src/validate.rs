//! Structural validation of a surface.

use crate::element::{FaceId, HalfEdgeId, VertexId};
use crate::surface::Surface;

/// One structural problem found by [`Surface::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyIssue {
    /// `twin(twin(e)) != e`, or the twin is dead or out of range.
    AsymmetricTwin(HalfEdgeId),
    /// Twins do not run in opposite directions between the same vertices.
    MismatchedTwin(HalfEdgeId),
    /// The `next` chain of a face does not close after three steps, or
    /// leaves the face.
    BrokenCycle(FaceId),
    /// A live face references a dead half-edge, or a live half-edge a dead
    /// face or vertex.
    DeadReference(HalfEdgeId),
    /// A vertex's outgoing half-edge is dead or starts elsewhere.
    BadOutgoing(VertexId),
}

/// Result of validating a surface.
#[derive(Debug, Clone, Default)]
pub struct TopologyReport {
    /// Live vertices.
    pub vertex_count: usize,
    /// Live half-edges.
    pub half_edge_count: usize,
    /// Live faces.
    pub face_count: usize,
    /// Live half-edges without twin.
    pub frontier_count: usize,
    /// Live faces with repeated corners.
    pub degenerate_face_count: usize,
    /// Live vertices that start no live half-edge.
    pub isolated_vertex_count: usize,
    /// Structural problems, in arena order.
    pub issues: Vec<TopologyIssue>,
}

impl TopologyReport {
    /// True when no structural issue was found.
    ///
    /// Frontier edges, degenerate faces and isolated vertices are counted
    /// but do not make a surface invalid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// True when the surface has no frontier edges.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.frontier_count == 0
    }
}

impl std::fmt::Display for TopologyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Topology Report:")?;
        writeln!(f, "  Vertices: {}", self.vertex_count)?;
        writeln!(f, "  Half-edges: {}", self.half_edge_count)?;
        writeln!(f, "  Faces: {}", self.face_count)?;
        writeln!(f, "  Frontier edges: {}", self.frontier_count)?;
        if self.degenerate_face_count > 0 {
            writeln!(f, "  Degenerate faces: {}", self.degenerate_face_count)?;
        }
        if self.isolated_vertex_count > 0 {
            writeln!(f, "  Isolated vertices: {}", self.isolated_vertex_count)?;
        }
        if self.is_valid() {
            writeln!(f, "  Status: Valid")?;
        } else {
            writeln!(f, "  Status: {} issue(s)", self.issues.len())?;
            for issue in self.issues.iter().take(10) {
                writeln!(f, "    {issue:?}")?;
            }
        }
        Ok(())
    }
}

impl Surface {
    /// Check twin symmetry, cycle closure, liveness closure and outgoing
    /// references.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_halfedge::build_topology;
    /// use mesh_types::unit_cube;
    ///
    /// let report = build_topology(&unit_cube()).unwrap().validate();
    /// assert!(report.is_valid());
    /// assert!(report.is_closed());
    /// ```
    #[must_use]
    pub fn validate(&self) -> TopologyReport {
        let mut report = TopologyReport {
            vertex_count: self.vertex_count(),
            half_edge_count: self.half_edge_count(),
            face_count: self.face_count(),
            ..TopologyReport::default()
        };

        let mut starts_edge = vec![false; self.vertices.len()];

        for (e, he) in self.live_half_edges() {
            let origin_live = self.vertex(he.origin).is_some_and(|v| v.is_live());
            let face_live = self.face(he.face).is_some_and(|f| f.is_live());
            if !origin_live || !face_live || self.half_edge(he.next).is_none_or(|n| !n.is_live()) {
                report.issues.push(TopologyIssue::DeadReference(e));
                continue;
            }
            starts_edge[he.origin.index()] = true;

            match he.twin {
                None => report.frontier_count += 1,
                Some(t) => match self.half_edge(t) {
                    Some(partner) if partner.is_live() && partner.twin == Some(e) => {
                        let (a, b) = (he.origin, self.end(e));
                        let (c, d) = (partner.origin, self.end(t));
                        let same_vertices = a == d && b == c;
                        let same_positions = self[a].position == self[d].position
                            && self[b].position == self[c].position;
                        if !same_vertices && !same_positions {
                            report.issues.push(TopologyIssue::MismatchedTwin(e));
                        }
                    }
                    _ => report.issues.push(TopologyIssue::AsymmetricTwin(e)),
                },
            }
        }

        for (f, face) in self.live_faces() {
            let Some(cycle) = self.face_cycle(f) else {
                report.issues.push(TopologyIssue::BrokenCycle(f));
                continue;
            };
            let closes = self[cycle[2]].next == face.half_edge;
            let distinct = cycle[0] != cycle[1] && cycle[1] != cycle[2] && cycle[2] != cycle[0];
            let owned = cycle.iter().all(|&e| self[e].face == f);
            if !closes || !distinct || !owned {
                report.issues.push(TopologyIssue::BrokenCycle(f));
                continue;
            }
            if let Some(&dead) = cycle.iter().find(|&&e| !self[e].is_live()) {
                report.issues.push(TopologyIssue::DeadReference(dead));
                continue;
            }
            if self.is_face_degenerate(f) {
                report.degenerate_face_count += 1;
            }
        }

        for (v, vertex) in self.live_vertices() {
            if !starts_edge[v.index()] {
                report.isolated_vertex_count += 1;
            }
            if let Some(out) = vertex.outgoing {
                let ok = self
                    .half_edge(out)
                    .is_some_and(|he| he.is_live() && he.origin == v);
                if !ok {
                    report.issues.push(TopologyIssue::BadOutgoing(v));
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_topology;
    use mesh_types::{grid_plane, unit_cube};

    #[test]
    fn open_grid_is_valid_not_closed() {
        let report = build_topology(&grid_plane(3, 3.0, 0.0)).unwrap().validate();
        assert!(report.is_valid());
        assert!(!report.is_closed());
        assert_eq!(report.frontier_count, 12);
        assert_eq!(report.isolated_vertex_count, 0);
    }

    #[test]
    fn asymmetric_twin_is_reported() {
        let mut s = build_topology(&unit_cube()).unwrap();
        let e = HalfEdgeId(0);
        let t = s[e].twin.unwrap();
        s[t].twin = None;
        let report = s.validate();
        assert!(report.issues.contains(&TopologyIssue::AsymmetricTwin(e)));
    }

    #[test]
    fn bad_outgoing_is_reported() {
        let mut s = build_topology(&unit_cube()).unwrap();
        s[VertexId(0)].outgoing = Some(HalfEdgeId(1));
        assert!(s.validate().issues.contains(&TopologyIssue::BadOutgoing(VertexId(0))));
    }

    #[test]
    fn broken_cycle_is_reported() {
        let mut s = build_topology(&unit_cube()).unwrap();
        let [h0, _, _] = s.face_half_edges(FaceId(2));
        s[h0].next = h0;
        let report = s.validate();
        assert!(!report.is_valid());
        assert!(report.to_string().contains("issue"));
    }
}
