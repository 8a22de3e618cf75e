//! Partitioning a surface into the two sides of a plane.

use mesh_halfedge::Surface;
use mesh_types::Axis;
use tracing::debug;

/// Copy the live faces of `surface` into two new surfaces by which side of
/// the plane `axis = coordinate` their centroid falls on.
///
/// Returns `(below, above)`; faces with a centroid exactly on the plane go
/// above. Run [`cut_by_plane`](crate::cut_by_plane) first so no face
/// straddles the plane. Twins crossing the partition become frontier edges
/// on both sides.
///
/// # Example
///
/// ```
/// use mesh_cut::{cut_by_plane, split_by_plane};
/// use mesh_halfedge::build_topology;
/// use mesh_types::{grid_plane, Axis};
///
/// let mut surface = build_topology(&grid_plane(4, 4.0, 0.0)).unwrap();
/// cut_by_plane(&mut surface, Axis::X, 1.5, 1e-9);
///
/// let (west, east) = split_by_plane(&surface, Axis::X, 1.5);
/// assert!((west.area() - 6.0).abs() < 1e-9);
/// assert!((east.area() - 10.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn split_by_plane(surface: &Surface, axis: Axis, coordinate: f64) -> (Surface, Surface) {
    let side = |f| axis.coord(&surface.face_triangle(f).centroid()) < coordinate;

    let below = surface.extract(|f, _| side(f));
    let above = surface.extract(|f, _| !side(f));

    debug!(
        axis = ?axis,
        coordinate,
        below = below.face_count(),
        above = above.face_count(),
        "Partitioned surface"
    );

    (below, above)
}
