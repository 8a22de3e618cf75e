//! Tagging frontier edges that lie on tile sides.

use mesh_halfedge::{BoundaryClass, FaceKind, HalfEdgeId, Surface};
use mesh_types::Aabb;
use tracing::debug;

/// Tag frontier half-edges lying on a side of `bounds` with that side's
/// [`BoundaryClass`] id, along with their two endpoint vertices.
///
/// A frontier half-edge of a normal face lies on a side when both endpoints
/// are within `tolerance` of it. Corner edges touching two sides take the
/// first matching class in [`BoundaryClass::ALL`] order. Edges already
/// classified are re-tagged; skirt faces are ignored.
///
/// Returns the number of half-edges tagged.
///
/// # Example
///
/// ```
/// use mesh_cut::classify_tile_boundary;
/// use mesh_halfedge::{build_topology, BoundaryClass};
/// use mesh_types::{grid_plane, MeshBounds};
///
/// let mut surface = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
/// let bounds = surface.bounds();
///
/// assert_eq!(classify_tile_boundary(&mut surface, &bounds, 1e-9), 8);
/// let south = surface
///     .live_half_edges()
///     .filter(|(_, he)| he.class_id == BoundaryClass::South.id())
///     .count();
/// assert_eq!(south, 2);
/// ```
pub fn classify_tile_boundary(surface: &mut Surface, bounds: &Aabb, tolerance: f64) -> usize {
    let tolerance = if tolerance.is_finite() { tolerance.abs() } else { 0.0 };

    let tagged: Vec<(HalfEdgeId, BoundaryClass)> = surface
        .live_half_edges()
        .filter(|(_, he)| he.is_frontier() && surface[he.face].kind == FaceKind::Normal)
        .filter_map(|(e, he)| {
            let a = surface[he.origin].position;
            let b = surface[surface.end(e)].position;
            BoundaryClass::ALL
                .into_iter()
                .find(|class| {
                    let axis = class.axis();
                    let side = if class.is_min_side() {
                        bounds.min_along(axis)
                    } else {
                        bounds.max_along(axis)
                    };
                    (axis.coord(&a) - side).abs() <= tolerance
                        && (axis.coord(&b) - side).abs() <= tolerance
                })
                .map(|class| (e, class))
        })
        .collect();

    for &(e, class) in &tagged {
        let id = class.id();
        surface[e].class_id = id;
        let origin = surface[e].origin;
        let end = surface.end(e);
        surface[origin].class_id = id;
        surface[end].class_id = id;
    }

    debug!(tagged = tagged.len(), "Classified tile boundary edges");
    tagged.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_halfedge::build_topology;
    use mesh_types::{Axis, MeshBounds, grid_plane, unit_cube};

    fn count(surface: &Surface, class: BoundaryClass) -> usize {
        surface
            .live_half_edges()
            .filter(|(_, he)| he.class_id == class.id())
            .count()
    }

    #[test]
    fn grid_sides_are_classified() {
        let mut s = build_topology(&grid_plane(3, 3.0, 0.0)).unwrap();
        let bounds = s.bounds();
        assert_eq!(classify_tile_boundary(&mut s, &bounds, 1e-9), 12);
        for class in BoundaryClass::ALL {
            assert_eq!(count(&s, class), 3);
        }
    }

    #[test]
    fn side_vertices_take_class() {
        let mut s = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
        let bounds = s.bounds();
        classify_tile_boundary(&mut s, &bounds, 1e-9);
        let center = s
            .live_vertices()
            .find(|(_, v)| v.position.x == 1.0 && v.position.y == 1.0)
            .map(|(_, v)| v.class_id);
        assert_eq!(center, Some(0));
        let south_mid = s
            .live_vertices()
            .find(|(_, v)| v.position.x == 1.0 && v.position.y == 0.0)
            .map(|(_, v)| v.class_id);
        assert_eq!(south_mid, Some(BoundaryClass::South.id()));
    }

    #[test]
    fn interior_opening_is_not_classified() {
        let mut s = build_topology(&grid_plane(3, 3.0, 0.0)).unwrap();
        let bounds = s.bounds().expanded(1.0);
        assert_eq!(classify_tile_boundary(&mut s, &bounds, 1e-9), 0);
    }

    #[test]
    fn closed_surface_has_no_frontier() {
        let mut s = build_topology(&unit_cube()).unwrap();
        let bounds = s.bounds();
        assert_eq!(classify_tile_boundary(&mut s, &bounds, 1e-9), 0);
        assert_eq!(BoundaryClass::West.axis(), Axis::X);
    }
}
