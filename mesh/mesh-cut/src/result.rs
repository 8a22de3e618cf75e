//! Cut result types.

use mesh_types::Axis;

/// Result of [`cut_surface`](crate::cut_surface).
#[derive(Debug, Clone, PartialEq)]
pub struct CutSummary {
    /// Axis of the cutting plane.
    pub axis: Axis,
    /// Plane position along the axis.
    pub coordinate: f64,
    /// Edges split (a twin pair counts once).
    pub edges_split: usize,
    /// Vertices created on the plane.
    pub vertices_added: usize,
    /// Live faces before the cut.
    pub faces_before: usize,
    /// Live faces after the cut.
    pub faces_after: usize,
}

impl CutSummary {
    /// Check if the plane split anything.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.edges_split > 0
    }
}

impl std::fmt::Display for CutSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cut {:?}={}: {} edges split, {} vertices added, {} -> {} faces",
            self.axis,
            self.coordinate,
            self.edges_split,
            self.vertices_added,
            self.faces_before,
            self.faces_after,
        )
    }
}
