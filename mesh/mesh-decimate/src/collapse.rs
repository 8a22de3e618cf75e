//! Evaluation and execution of a single half-edge collapse.
//!
//! A collapse moves the origin of a half-edge (the doomed vertex, with every
//! vertex sharing its position) onto the end (the survivor). Collapses only
//! rewire origins; the faces that vanish are swept up after the sweep.

use mesh_halfedge::{FaceId, FaceKind, HalfEdgeId, Surface, SweepIndex, VertexId};
use mesh_repair::AttributeMatch;
use mesh_types::{Point3, Triangle, Vector3};
use tracing::warn;

use crate::params::Thresholds;
use crate::result::RejectionCounts;

/// Triangles below this area count as having none.
pub(crate) const NEGLIGIBLE_AREA: f64 = 1e-12;

/// Skirt faces must stay closer to their original orientation.
const SKIRT_ANGLE_FACTOR: f64 = 0.3;

/// How a candidate edge sits in the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EdgeClass {
    /// Twinned edge whose doomed vertex touches no frontier or skirt.
    Interior,
    /// Frontier edge.
    Boundary,
}

impl EdgeClass {
    /// Largest number of neighbour positions the endpoints may share.
    const fn link_limit(self) -> usize {
        match self {
            Self::Interior => 2,
            Self::Boundary => 1,
        }
    }
}

/// Why a candidate was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rejection {
    AspectRatio,
    CollapsedArea,
    NormalAngle,
    FrontierAngle,
    Topology,
    Seam,
    Structural,
}

impl Rejection {
    pub(crate) fn record(self, counts: &mut RejectionCounts) {
        let slot = match self {
            Self::AspectRatio => &mut counts.aspect_ratio,
            Self::CollapsedArea => &mut counts.collapsed_area,
            Self::NormalAngle => &mut counts.normal_angle,
            Self::FrontierAngle => &mut counts.frontier_angle,
            Self::Topology => &mut counts.topology,
            Self::Seam => &mut counts.seam,
            Self::Structural => &mut counts.structural,
        };
        *slot += 1;
    }
}

/// Outcome of evaluating a candidate that will not collapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Declined {
    /// Not a collapse candidate at all (dead, degenerate, unclassifiable).
    Skip,
    /// Failed a gate.
    Reject(Rejection),
}

impl From<Rejection> for Declined {
    fn from(r: Rejection) -> Self {
        Self::Reject(r)
    }
}

/// An accepted collapse.
#[derive(Debug, Clone)]
pub(crate) struct Collapse {
    pub edge: HalfEdgeId,
    pub doomed: VertexId,
    pub survivor: VertexId,
    pub class: EdgeClass,
    /// Every half-edge leaving the doomed position and the survivor
    /// duplicate it will start at.
    pub moves: Vec<(HalfEdgeId, VertexId)>,
}

/// Read-only view used to judge candidates against the current surface.
pub(crate) struct Evaluator<'a> {
    pub surface: &'a Surface,
    pub index: &'a SweepIndex,
    pub thresholds: &'a Thresholds,
}

impl Evaluator<'_> {
    /// Decide whether half-edge `e` may collapse onto its end.
    pub(crate) fn evaluate(&self, e: HalfEdgeId) -> Result<Collapse, Declined> {
        let s = self.surface;
        let he = s.half_edge(e).ok_or(Declined::Skip)?;
        if !he.is_live() || !s[he.face].is_live() || s.is_face_degenerate(he.face) {
            return Err(Declined::Skip);
        }

        let doomed = he.origin;
        let survivor = s.end(e);
        if self.index.same_group(doomed, survivor) {
            return Err(Declined::Skip);
        }

        if let Some(t) = he.twin {
            let symmetric = s
                .half_edge(t)
                .is_some_and(|th| th.is_live() && th.twin == Some(e));
            if !symmetric {
                warn!(half_edge = %e, twin = %t, "Asymmetric twin, skipping collapse");
                return Err(Rejection::Structural.into());
            }
        }

        let doomed_out = live_group_outgoing(s, self.index, doomed);
        if !doomed_out.contains(&e) {
            warn!(half_edge = %e, vertex = %doomed, "Half-edge missing from outgoing index, skipping collapse");
            return Err(Rejection::Structural.into());
        }

        let class = if he.twin.is_some() {
            let interior = doomed_out
                .iter()
                .all(|&h| s[h].twin.is_some() && s[s[h].face].kind == FaceKind::Normal);
            if !interior {
                return Err(Declined::Skip);
            }
            EdgeClass::Interior
        } else {
            EdgeClass::Boundary
        };

        self.check_link(doomed, survivor, &doomed_out, class)?;

        let length = s.half_edge_length_sq(e).sqrt();
        self.check_faces(doomed, survivor, &doomed_out, length)?;
        self.check_frontier(e, doomed, survivor, &doomed_out)?;
        let moves = self.plan_moves(survivor, &doomed_out)?;

        Ok(Collapse {
            edge: e,
            doomed,
            survivor,
            class,
            moves,
        })
    }

    /// The endpoints may share at most the neighbours of the faces that
    /// vanish, or the collapse pinches the surface.
    fn check_link(
        &self,
        doomed: VertexId,
        survivor: VertexId,
        doomed_out: &[HalfEdgeId],
        class: EdgeClass,
    ) -> Result<(), Rejection> {
        let s = self.surface;
        let survivor_out = live_group_outgoing(s, self.index, survivor);
        let around_doomed = neighbour_groups(s, self.index, doomed_out);
        let around_survivor = neighbour_groups(s, self.index, &survivor_out);

        let (dg, sg) = (self.index.group(doomed), self.index.group(survivor));
        let common = around_doomed
            .iter()
            .filter(|&&g| g != dg && g != sg && around_survivor.binary_search(&g).is_ok())
            .count();

        if common > class.link_limit() {
            return Err(Rejection::Topology);
        }
        Ok(())
    }

    /// Quality gates over every face around the doomed position that
    /// survives the collapse.
    fn check_faces(
        &self,
        doomed: VertexId,
        survivor: VertexId,
        doomed_out: &[HalfEdgeId],
        length: f64,
    ) -> Result<(), Rejection> {
        let s = self.surface;
        let target = s[survivor].position;
        let tested = length >= self.thresholds.hedge_min_length;
        let factor = self.thresholds.angle_factor(length);

        for f in incident_faces(s, doomed_out) {
            let corners = s.face_vertices(f);
            if corners.iter().any(|&v| self.index.same_group(v, survivor)) {
                continue;
            }

            let old = s.face_triangle(f);
            let moved = corners.map(|v| {
                if self.index.same_group(v, doomed) {
                    target
                } else {
                    s[v].position
                }
            });
            let new = Triangle::new(moved[0], moved[1], moved[2]);

            let old_area = old.area();
            let new_area = new.area();
            if old_area > NEGLIGIBLE_AREA && new_area <= NEGLIGIBLE_AREA {
                return Err(Rejection::CollapsedArea);
            }
            if !tested {
                continue;
            }

            if new_area > NEGLIGIBLE_AREA && new.aspect_ratio() > self.thresholds.max_aspect_ratio {
                return Err(Rejection::AspectRatio);
            }

            let limit = if s[f].kind == FaceKind::Skirt {
                self.thresholds.max_diff_angle_deg * SKIRT_ANGLE_FACTOR
            } else {
                self.thresholds.max_diff_angle_deg
            };
            if old.normal_angle_deg(&new) * factor > limit {
                return Err(Rejection::NormalAngle);
            }
        }
        Ok(())
    }

    /// Frontier edges touching the doomed position must keep their
    /// direction, or tile boundaries erode into zig-zags.
    fn check_frontier(
        &self,
        e: HalfEdgeId,
        doomed: VertexId,
        survivor: VertexId,
        doomed_out: &[HalfEdgeId],
    ) -> Result<(), Rejection> {
        let s = self.surface;
        let from = s[doomed].position;
        let to = s[survivor].position;
        let limit = self.thresholds.frontier_max_diff_angle_deg;

        let turns = |other: Point3<f64>, outgoing: bool| {
            let (old, new) = if outgoing {
                (other - from, other - to)
            } else {
                (from - other, to - other)
            };
            vector_angle_deg(&old, &new).is_some_and(|angle| angle > limit)
        };

        for &h in doomed_out {
            if h != e && s[h].is_frontier() {
                let other = s.end(h);
                if !self.index.same_group(other, survivor) && turns(s[other].position, true) {
                    return Err(Rejection::FrontierAngle);
                }
            }
            let p = s.prev(h);
            if s[p].is_frontier() {
                let other = s[p].origin;
                if !self.index.same_group(other, survivor) && turns(s[other].position, false) {
                    return Err(Rejection::FrontierAngle);
                }
            }
        }
        Ok(())
    }

    /// Pick the survivor duplicate each half-edge in `doomed_out` moves to.
    ///
    /// A half-edge whose face already holds a survivor duplicate takes that
    /// one. The others follow a doomed duplicate with the same texture
    /// coordinates, color and batch id whose face does, preferring a
    /// partner with the same classification id. A doomed duplicate without
    /// such a partner belongs to a texture island the survivor position is
    /// not part of.
    fn plan_moves(
        &self,
        survivor: VertexId,
        doomed_out: &[HalfEdgeId],
    ) -> Result<Vec<(HalfEdgeId, VertexId)>, Rejection> {
        let s = self.surface;
        let matching = AttributeMatch::default();
        let on_face = |h: HalfEdgeId| {
            s.face_vertices(s[h].face)
                .into_iter()
                .find(|&v| self.index.same_group(v, survivor))
        };

        let anchors: Vec<(VertexId, VertexId)> = doomed_out
            .iter()
            .filter_map(|&h| Some((s[h].origin, on_face(h)?)))
            .collect();

        doomed_out
            .iter()
            .map(|&h| {
                if let Some(m) = on_face(h) {
                    return Ok((h, m));
                }
                let origin = &s[s[h].origin];
                let partners: Vec<VertexId> = anchors
                    .iter()
                    .filter(|(d, _)| matching.matches(&s[*d].attributes, &origin.attributes))
                    .map(|&(_, m)| m)
                    .collect();
                let same_class = partners
                    .iter()
                    .find(|&&m| origin.class_id != 0 && s[m].class_id == origin.class_id);
                same_class
                    .or_else(|| partners.first())
                    .map(|&m| (h, m))
                    .ok_or(Rejection::Seam)
            })
            .collect()
    }
}

/// Redirect every half-edge leaving the doomed position to a survivor.
///
/// Redirected half-edges, and the twin of the collapsed edge, are marked
/// consumed for the rest of the sweep.
pub(crate) fn apply(
    surface: &mut Surface,
    index: &mut SweepIndex,
    consumed: &mut [bool],
    collapse: &Collapse,
) {
    for &(h, target) in &collapse.moves {
        surface[h].origin = target;
        consumed[h.index()] = true;
        index.push_outgoing(target, h);
    }
    if let Some(t) = surface[collapse.edge].twin {
        consumed[t.index()] = true;
    }
}

/// Live half-edges currently starting at a vertex of `v`'s position group.
pub(crate) fn live_group_outgoing(
    surface: &Surface,
    index: &SweepIndex,
    v: VertexId,
) -> Vec<HalfEdgeId> {
    let group = index.group(v);
    let mut out: Vec<HalfEdgeId> = index
        .group_outgoing(v)
        .filter(|&h| {
            let he = &surface[h];
            he.is_live() && index.group(he.origin) == group
        })
        .collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Position groups adjacent to the fan described by `outgoing`.
fn neighbour_groups(surface: &Surface, index: &SweepIndex, outgoing: &[HalfEdgeId]) -> Vec<u32> {
    let mut groups: Vec<u32> = outgoing
        .iter()
        .flat_map(|&h| {
            [
                index.group(surface.end(h)),
                index.group(surface[surface.prev(h)].origin),
            ]
        })
        .collect();
    groups.sort_unstable();
    groups.dedup();
    groups
}

fn incident_faces(surface: &Surface, outgoing: &[HalfEdgeId]) -> Vec<FaceId> {
    let mut faces: Vec<FaceId> = outgoing.iter().map(|&h| surface[h].face).collect();
    faces.sort_unstable();
    faces.dedup();
    faces
}

/// Angle between two directions in degrees, `None` if either is zero.
fn vector_angle_deg(a: &Vector3<f64>, b: &Vector3<f64>) -> Option<f64> {
    let a = a.try_normalize(f64::EPSILON)?;
    let b = b.try_normalize(f64::EPSILON)?;
    Some(a.dot(&b).clamp(-1.0, 1.0).acos().to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::DecimateParams;
    use mesh_halfedge::{TwinMatch, build_topology, build_topology_with};
    use mesh_types::{IndexedMesh, Vertex, grid_plane, unit_cube};

    /// 4 x 4 unit grid whose halves are separate texture islands; the
    /// vertices of column x = 2 exist once per island.
    fn seamed_grid() -> Surface {
        let mut vertices = Vec::new();
        let mut faces = Vec::new();
        for (x0, u0) in [(0u32, 0.0), (2, 0.6)] {
            let base = u32::try_from(vertices.len()).unwrap();
            for j in 0..=4u32 {
                for i in 0..=2u32 {
                    let (x, y) = (f64::from(x0 + i), f64::from(j));
                    vertices.push(Vertex::from_coords(x, y, 0.0).with_uv(u0 + 0.2 * f64::from(i), y / 4.0));
                }
            }
            for j in 0..4 {
                for i in 0..2 {
                    let a = base + j * 3 + i;
                    faces.push([a, a + 1, a + 4]);
                    faces.push([a, a + 4, a + 3]);
                }
            }
        }
        let mesh = IndexedMesh::from_parts(vertices, faces);
        build_topology_with(&mesh, TwinMatch::Position { tolerance: 0.0 }).unwrap()
    }

    fn island(surface: &Surface, v: VertexId) -> bool {
        surface[v].attributes.uv.unwrap().x > 0.5
    }

    fn find_edge(surface: &Surface, from: [f64; 2], to: [f64; 2]) -> HalfEdgeId {
        surface
            .live_half_edges()
            .find(|&(e, he)| {
                let a = surface[he.origin].position;
                let b = surface[surface.end(e)].position;
                a.x == from[0] && a.y == from[1] && b.x == to[0] && b.y == to[1]
            })
            .map(|(e, _)| e)
            .unwrap()
    }

    fn evaluate(surface: &Surface, params: &DecimateParams, e: HalfEdgeId) -> Result<Collapse, Declined> {
        let index = SweepIndex::build(surface);
        let thresholds = params.thresholds(0);
        Evaluator {
            surface,
            index: &index,
            thresholds: &thresholds,
        }
        .evaluate(e)
    }

    #[test]
    fn interior_vertex_of_flat_grid_collapses() {
        let s = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
        let e = find_edge(&s, [1.0, 1.0], [1.0, 0.0]);
        let c = evaluate(&s, &DecimateParams::default(), e).unwrap();
        assert_eq!(c.class, EdgeClass::Interior);
        assert_eq!(s[c.doomed].position, Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn edge_leaving_the_boundary_is_skipped() {
        let s = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
        // Interior edge, but its origin sits on the border
        let e = find_edge(&s, [1.0, 0.0], [1.0, 1.0]);
        assert_eq!(evaluate(&s, &DecimateParams::default(), e).unwrap_err(), Declined::Skip);
    }

    #[test]
    fn straight_boundary_collapses_but_corner_does_not() {
        let s = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
        let along = find_edge(&s, [1.0, 0.0], [2.0, 0.0]);
        let c = evaluate(&s, &DecimateParams::default(), along).unwrap();
        assert_eq!(c.class, EdgeClass::Boundary);

        let corner = find_edge(&s, [0.0, 0.0], [1.0, 0.0]);
        assert_eq!(
            evaluate(&s, &DecimateParams::default(), corner).unwrap_err(),
            Declined::Reject(Rejection::FrontierAngle)
        );
    }

    #[test]
    fn leaving_a_seam_sideways_is_rejected() {
        let s = seamed_grid();
        // The survivor lies inside the left island only
        let e = find_edge(&s, [2.0, 1.0], [1.0, 1.0]);
        assert_eq!(
            evaluate(&s, &DecimateParams::default(), e).unwrap_err(),
            Declined::Reject(Rejection::Seam)
        );
    }

    #[test]
    fn sliding_along_a_seam_keeps_islands() {
        let s = seamed_grid();
        let e = find_edge(&s, [2.0, 1.0], [2.0, 2.0]);
        let c = evaluate(&s, &DecimateParams::default(), e).unwrap();

        assert_eq!(c.class, EdgeClass::Interior);
        assert_eq!(c.moves.len(), 6);
        for &(h, target) in &c.moves {
            assert_eq!(island(&s, s[h].origin), island(&s, target));
            assert_eq!(s[target].position, Point3::new(2.0, 2.0, 0.0));
        }
    }

    #[test]
    fn cube_edges_fail_normal_test() {
        let s = build_topology(&unit_cube()).unwrap();
        let params = DecimateParams::default().with_max_diff_angle_deg(10.0);
        for (e, _) in s.live_half_edges() {
            let result = evaluate(&s, &params, e);
            assert!(result.is_err(), "cube edge {e} should not collapse");
        }
    }

    #[test]
    fn collapse_onto_a_line_is_rejected() {
        // Moving (1,1) onto (4,0) lays the left face flat along the x axis
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 1.0, 0.0),
                Vertex::from_coords(2.0, 0.0, 0.0),
                Vertex::from_coords(4.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2], [1, 3, 2]],
        );
        let s = build_topology(&mesh).unwrap();
        let e = find_edge(&s, [1.0, 1.0], [4.0, 0.0]);
        let params = DecimateParams::default().with_max_diff_angle_deg(180.0);
        assert_eq!(
            evaluate(&s, &params, e).unwrap_err(),
            Declined::Reject(Rejection::CollapsedArea)
        );
    }

    #[test]
    fn vector_angles() {
        let x = Vector3::x();
        let y = Vector3::y();
        assert!((vector_angle_deg(&x, &y).unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(vector_angle_deg(&x, &Vector3::zeros()), None);
    }
}
