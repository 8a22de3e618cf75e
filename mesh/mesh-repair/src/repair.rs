//! Degenerate-face and unreferenced-vertex removal, and the repair pipeline.

use mesh_halfedge::{FaceId, Surface, VertexId};
use tracing::{debug, info};

use crate::error::{RepairError, RepairResult};
use crate::weld::{WeldParams, weld_vertices};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for [`repair_surface`].
///
/// All distances are in the same units as the surface coordinates.
///
/// # Example
///
/// ```
/// use mesh_repair::RepairParams;
///
/// let params = RepairParams::for_lod_cleanup()
///     .with_degenerate_area_threshold(1e-8);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RepairParams {
    /// Welding configuration.
    pub weld: WeldParams,

    /// Faces with an area below this are removed.
    /// Default: `1e-12`
    pub degenerate_area_threshold: f64,

    /// Whether to tombstone vertices that start no live half-edge.
    /// Default: `true`
    pub remove_unreferenced: bool,

    /// Whether to compact the surface at the end.
    /// Default: `true`
    pub compact: bool,
}

impl Default for RepairParams {
    fn default() -> Self {
        Self {
            weld: WeldParams::default(),
            degenerate_area_threshold: 1e-12,
            remove_unreferenced: true,
            compact: true,
        }
    }
}

impl RepairParams {
    /// Cleanup after a simplification pass: exact welding with attribute
    /// matching, only truly zero-area faces dropped.
    #[must_use]
    pub fn for_lod_cleanup() -> Self {
        Self {
            weld: WeldParams::exact(),
            degenerate_area_threshold: 0.0,
            ..Self::default()
        }
    }

    /// Cleanup of an unwelded triangle soup straight from an exporter.
    #[must_use]
    pub fn for_soup_import() -> Self {
        Self {
            weld: WeldParams::default().with_tolerance(1e-5),
            degenerate_area_threshold: 1e-10,
            ..Self::default()
        }
    }

    /// Set the weld parameters.
    #[must_use]
    pub const fn with_weld(mut self, weld: WeldParams) -> Self {
        self.weld = weld;
        self
    }

    /// Set the minimum face area.
    #[must_use]
    pub const fn with_degenerate_area_threshold(mut self, threshold: f64) -> Self {
        self.degenerate_area_threshold = threshold;
        self
    }

    /// Set whether unreferenced vertices are removed.
    #[must_use]
    pub const fn with_remove_unreferenced(mut self, remove: bool) -> Self {
        self.remove_unreferenced = remove;
        self
    }

    /// Set whether the surface is compacted at the end.
    #[must_use]
    pub const fn with_compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Check thresholds for negative or non-finite values.
    ///
    /// # Errors
    ///
    /// Returns [`RepairError::InvalidTolerance`] or
    /// [`RepairError::InvalidAreaThreshold`].
    pub fn validate(&self) -> RepairResult<()> {
        if !self.weld.tolerance.is_finite() || self.weld.tolerance < 0.0 {
            return Err(RepairError::InvalidTolerance(self.weld.tolerance));
        }
        if !self.degenerate_area_threshold.is_finite() || self.degenerate_area_threshold < 0.0 {
            return Err(RepairError::InvalidAreaThreshold(self.degenerate_area_threshold));
        }
        Ok(())
    }
}

/// Tombstone faces with a repeated corner or an area below `area_threshold`.
///
/// Returns the number of faces removed.
///
/// # Example
///
/// ```
/// use mesh_halfedge::build_topology;
/// use mesh_repair::remove_degenerate_faces;
/// use mesh_types::{IndexedMesh, Vertex};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(5.0, 0.0, 0.0),
///         Vertex::from_coords(10.0, 0.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// let mut surface = build_topology(&mesh).unwrap();
/// assert_eq!(remove_degenerate_faces(&mut surface, 1e-9), 1);
/// ```
pub fn remove_degenerate_faces(surface: &mut Surface, area_threshold: f64) -> usize {
    let doomed: Vec<FaceId> = surface
        .live_faces()
        .map(|(f, _)| f)
        .filter(|&f| surface.is_face_degenerate(f) || surface.face_triangle(f).area() < area_threshold)
        .collect();
    tombstone_faces(surface, &doomed)
}

/// Tombstone faces whose corners collapsed onto each other (same vertex or
/// bit-identical position), regardless of area thresholds.
///
/// This is the cleanup after edge collapses: only the faces that vanished
/// geometrically are removed, so no holes open in the surface.
///
/// Returns the number of faces removed.
pub fn remove_collapsed_faces(surface: &mut Surface) -> usize {
    let doomed: Vec<FaceId> = surface
        .live_faces()
        .map(|(f, _)| f)
        .filter(|&f| surface.is_face_degenerate(f))
        .collect();
    tombstone_faces(surface, &doomed)
}

fn tombstone_faces(surface: &mut Surface, faces: &[FaceId]) -> usize {
    for &f in faces {
        surface.tombstone_face(f);
    }
    if !faces.is_empty() {
        surface.refresh_outgoing();
    }
    faces.len()
}

/// Tombstone live vertices that start no live half-edge.
///
/// Returns the number of vertices removed.
///
/// # Example
///
/// ```
/// use mesh_halfedge::{build_topology, FaceId};
/// use mesh_repair::remove_unreferenced_vertices;
/// use mesh_types::grid_plane;
///
/// let mut surface = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
/// surface.tombstone_face(FaceId(0));
///
/// // The corner only used by the removed triangle goes away
/// assert_eq!(remove_unreferenced_vertices(&mut surface), 1);
/// assert_eq!(surface.vertex_count(), 3);
/// ```
pub fn remove_unreferenced_vertices(surface: &mut Surface) -> usize {
    let mut referenced = vec![false; surface.vertices().len()];
    for (_, he) in surface.live_half_edges() {
        referenced[he.origin.index()] = true;
    }

    let doomed: Vec<VertexId> = surface
        .live_vertices()
        .map(|(v, _)| v)
        .filter(|v| !referenced[v.index()])
        .collect();
    for &v in &doomed {
        surface.tombstone_vertex(v);
    }
    doomed.len()
}

/// Run the cleanup pipeline on a surface.
///
/// This performs:
/// 1. Remove degenerate faces
/// 2. Weld vertices
/// 3. Remove unreferenced vertices
/// 4. Compact
///
/// Invalid thresholds are clamped (see [`weld_vertices`]); use
/// [`RepairParams::validate`] to reject them instead.
///
/// # Example
///
/// ```
/// use mesh_halfedge::build_topology;
/// use mesh_repair::{repair_surface, RepairParams};
/// use mesh_types::unit_cube;
///
/// let mut surface = build_topology(&unit_cube().to_soup()).unwrap();
/// let summary = repair_surface(&mut surface, &RepairParams::for_soup_import());
///
/// assert_eq!(summary.final_vertices, 8);
/// assert_eq!(summary.final_faces, 12);
/// assert!(surface.validate().is_closed());
/// ```
#[must_use]
pub fn repair_surface(surface: &mut Surface, params: &RepairParams) -> RepairSummary {
    let initial_vertices = surface.vertex_count();
    let initial_faces = surface.face_count();

    let degenerates_removed = remove_degenerate_faces(surface, params.degenerate_area_threshold);
    let vertices_welded = weld_vertices(surface, &params.weld);
    let unreferenced_removed = if params.remove_unreferenced {
        remove_unreferenced_vertices(surface)
    } else {
        0
    };
    if params.compact {
        surface.compact();
    }

    let summary = RepairSummary {
        initial_vertices,
        initial_faces,
        final_vertices: surface.vertex_count(),
        final_faces: surface.face_count(),
        vertices_welded,
        degenerates_removed,
        unreferenced_removed,
    };

    if summary.had_changes() {
        info!(%summary, "Repaired surface");
    } else {
        debug!("Surface needed no repair");
    }

    summary
}

/// Result of [`repair_surface`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepairSummary {
    /// Live vertices before repair.
    pub initial_vertices: usize,
    /// Live faces before repair.
    pub initial_faces: usize,
    /// Live vertices after repair.
    pub final_vertices: usize,
    /// Live faces after repair.
    pub final_faces: usize,
    /// Vertices merged by welding.
    pub vertices_welded: usize,
    /// Degenerate faces removed.
    pub degenerates_removed: usize,
    /// Unreferenced vertices removed.
    pub unreferenced_removed: usize,
}

impl RepairSummary {
    /// Check if any repairs were performed.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.vertices_welded > 0 || self.degenerates_removed > 0 || self.unreferenced_removed > 0
    }
}

impl std::fmt::Display for RepairSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Repair: {} verts ({} welded, {} unreferenced), {} faces ({} degenerate)",
            self.final_vertices,
            self.vertices_welded,
            self.unreferenced_removed,
            self.final_faces,
            self.degenerates_removed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_halfedge::build_topology;
    use mesh_types::{IndexedMesh, Vertex, grid_plane, unit_cube};

    #[test]
    fn remove_degenerate_keeps_valid() {
        let mut s = build_topology(&unit_cube()).unwrap();
        assert_eq!(remove_degenerate_faces(&mut s, 1e-9), 0);
        assert_eq!(s.face_count(), 12);
    }

    #[test]
    fn collapsed_faces_ignore_area() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1e-8, 0.0),
                Vertex::from_coords(0.0, 0.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 1, 3]],
        );
        let mut s = build_topology(&mesh).unwrap();
        // Face 1 has two corners at the same position, face 0 is just thin
        assert_eq!(remove_collapsed_faces(&mut s), 1);
        assert_eq!(s.face_count(), 1);
        assert_eq!(remove_degenerate_faces(&mut s, 1e-6), 1);
    }

    #[test]
    fn unreferenced_none() {
        let mut s = build_topology(&unit_cube()).unwrap();
        assert_eq!(remove_unreferenced_vertices(&mut s), 0);
    }

    #[test]
    fn repair_is_noop_on_clean_grid() {
        let mut s = build_topology(&grid_plane(3, 3.0, 0.0)).unwrap();
        let summary = repair_surface(&mut s, &RepairParams::for_lod_cleanup());
        assert!(!summary.had_changes());
        assert_eq!(summary.final_faces, 18);
        assert!(summary.to_string().contains("18 faces"));
    }

    #[test]
    fn repair_soup_restores_connectivity() {
        let mut s = build_topology(&grid_plane(2, 2.0, 0.0).to_soup()).unwrap();
        let summary = repair_surface(&mut s, &RepairParams::default());
        assert_eq!(summary.final_vertices, 9);
        assert_eq!(s.frontier_count(), 8);
        assert_eq!(s.vertices().len(), 9);
        assert!(s.validate().is_valid());
    }

    #[test]
    fn params_validation() {
        assert!(RepairParams::default().validate().is_ok());
        let bad = RepairParams::default().with_weld(WeldParams::default().with_tolerance(-1.0));
        assert!(matches!(bad.validate(), Err(RepairError::InvalidTolerance(_))));
        let bad = RepairParams::default().with_degenerate_area_threshold(f64::NAN);
        assert!(matches!(bad.validate(), Err(RepairError::InvalidAreaThreshold(_))));
    }
}
