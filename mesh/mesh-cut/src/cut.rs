//! Axis-aligned plane cuts.

use mesh_halfedge::{HalfEdgeId, Surface};
use mesh_types::Axis;
use tracing::{debug, info, warn};

use crate::error::CutResult;
use crate::params::CutParams;
use crate::result::CutSummary;
use crate::split::split_edge_at;

/// Split every live edge that strictly crosses the plane `axis = coordinate`.
///
/// An edge crosses when one end lies below `coordinate - epsilon` and the
/// other above `coordinate + epsilon`; edges touching the plane within
/// `epsilon` are left alone. New vertices sit exactly on the plane.
///
/// Returns `true` if any edge was split. An invalid plane or epsilon is
/// logged and treated as a no-op; use [`cut_surface`] to get the error
/// instead.
///
/// # Example
///
/// ```
/// use mesh_cut::cut_by_plane;
/// use mesh_halfedge::build_topology;
/// use mesh_types::{grid_plane, Axis};
///
/// let mut surface = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
///
/// // x = 1.0 runs along grid lines, nothing crosses it
/// assert!(!cut_by_plane(&mut surface, Axis::X, 1.0, 1e-9));
///
/// assert!(cut_by_plane(&mut surface, Axis::X, 0.5, 1e-9));
/// assert!(surface.validate().is_valid());
/// ```
pub fn cut_by_plane(surface: &mut Surface, axis: Axis, coordinate: f64, epsilon: f64) -> bool {
    let params = CutParams::new(axis, coordinate).with_epsilon(epsilon);
    match cut_surface(surface, &params) {
        Ok(summary) => summary.had_changes(),
        Err(err) => {
            warn!(%err, "Ignoring invalid cut plane");
            false
        }
    }
}

/// Cut a surface by an axis-aligned plane and report what changed.
///
/// Half-edges created during the pass are examined as well, so a face
/// crossed on two edges ends up split along both.
///
/// # Errors
///
/// Returns [`CutError`](crate::CutError) if the plane coordinate is not
/// finite or the epsilon is invalid.
///
/// # Example
///
/// ```
/// use mesh_cut::{cut_surface, CutParams};
/// use mesh_halfedge::build_topology;
/// use mesh_types::{unit_cube, Axis};
///
/// let mut surface = build_topology(&unit_cube()).unwrap();
/// let summary = cut_surface(&mut surface, &CutParams::new(Axis::Z, 0.5)).unwrap();
///
/// assert!(summary.had_changes());
/// assert!(surface.validate().is_closed());
/// ```
pub fn cut_surface(surface: &mut Surface, params: &CutParams) -> CutResult<CutSummary> {
    params.validate()?;

    let faces_before = surface.face_count();
    let vertices_before = surface.vertex_count();

    info!(
        axis = ?params.axis,
        coordinate = params.coordinate,
        faces = faces_before,
        "Cutting surface by plane"
    );

    let mut edges_split = 0usize;
    let mut i = 0usize;
    // The arena grows while we walk it
    while i < surface.half_edges().len() {
        let e = HalfEdgeId::from_index(i);
        i += 1;

        let Some(t) = crossing(surface, e, params) else {
            continue;
        };
        if split_edge_at(surface, e, t, Some((params.axis, params.coordinate))).is_some() {
            edges_split += 1;
        }
    }

    let summary = CutSummary {
        axis: params.axis,
        coordinate: params.coordinate,
        edges_split,
        vertices_added: surface.vertex_count() - vertices_before,
        faces_before,
        faces_after: surface.face_count(),
    };
    debug!(%summary, "Cut complete");

    Ok(summary)
}

/// Split parameter of `e` if it strictly crosses the plane.
fn crossing(surface: &Surface, e: HalfEdgeId, params: &CutParams) -> Option<f64> {
    let he = &surface[e];
    if !he.is_live() {
        return None;
    }
    let da = params.axis.coord(&surface[he.origin].position) - params.coordinate;
    let db = params.axis.coord(&surface[surface.end(e)].position) - params.coordinate;

    let eps = params.epsilon;
    let crosses = (da < -eps && db > eps) || (da > eps && db < -eps);
    crosses.then(|| da / (da - db))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_halfedge::build_topology;
    use mesh_types::{IndexedMesh, MeshBounds, Vertex, grid_plane, unit_cube};

    #[test]
    fn cut_one_edge_conserves_area() {
        // The plane passes through the apex, so only the base is crossed
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(2.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 2.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let mut s = build_topology(&mesh).unwrap();
        let summary = cut_surface(&mut s, &CutParams::new(Axis::X, 1.0)).unwrap();

        assert_eq!(summary.edges_split, 1);
        assert_eq!(summary.faces_after, 2);
        assert_relative_eq!(s.area(), 2.0, epsilon = 1e-12);
        assert!(s.validate().is_valid());
    }

    #[test]
    fn cut_two_edges_of_one_face() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(2.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 2.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let mut s = build_topology(&mesh).unwrap();
        let summary = cut_surface(&mut s, &CutParams::new(Axis::X, 1.0)).unwrap();

        assert_eq!(summary.edges_split, 2);
        assert_eq!(summary.faces_after, 3);
        assert_relative_eq!(s.area(), 2.0, epsilon = 1e-12);
        assert!(s.validate().is_valid());

        // No remaining edge crosses the plane
        let params = CutParams::new(Axis::X, 1.0);
        assert!(
            s.live_half_edges()
                .all(|(e, _)| crossing(&s, e, &params).is_none())
        );
    }

    #[test]
    fn cut_vertices_lie_on_plane() {
        let mut s = build_topology(&grid_plane(3, 3.0, 0.0)).unwrap();
        let before = s.vertices().len();
        assert!(cut_by_plane(&mut s, Axis::Y, 1.25, 1e-9));
        for v in &s.vertices()[before..] {
            assert_eq!(v.position.y, 1.25);
        }
        assert_relative_eq!(s.area(), 9.0, epsilon = 1e-9);
    }

    #[test]
    fn cut_keeps_cube_closed() {
        let mut s = build_topology(&unit_cube()).unwrap();
        assert!(cut_by_plane(&mut s, Axis::X, 0.3, 1e-9));
        let report = s.validate();
        assert!(report.is_valid());
        assert!(report.is_closed());
        assert_relative_eq!(s.area(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn cut_outside_bounds_is_noop() {
        let mut s = build_topology(&unit_cube()).unwrap();
        let x = s.bounds().max.x + 1.0;
        assert!(!cut_by_plane(&mut s, Axis::X, x, 1e-9));
        assert_eq!(s.face_count(), 12);
    }

    #[test]
    fn invalid_plane_is_rejected() {
        let mut s = build_topology(&unit_cube()).unwrap();
        assert!(cut_surface(&mut s, &CutParams::new(Axis::X, f64::NAN)).is_err());
        assert!(!cut_by_plane(&mut s, Axis::X, f64::INFINITY, 0.0));
        assert_eq!(s.face_count(), 12);
    }
}
