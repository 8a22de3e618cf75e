//! Skirt result types.

/// Result of [`make_skirt`](crate::make_skirt).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkirtSummary {
    /// Boundary chains walked.
    pub chains: usize,
    /// Boundary half-edges found for the selected classes.
    pub boundary_edges: usize,
    /// Skirt triangles added.
    pub faces_added: usize,
    /// Extruded vertices added.
    pub vertices_added: usize,
    /// Quads skipped because an end had no direction.
    pub folded_skipped: usize,
}

impl SkirtSummary {
    /// Check if any skirt geometry was added.
    #[must_use]
    pub const fn had_changes(&self) -> bool {
        self.faces_added > 0
    }
}

impl std::fmt::Display for SkirtSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Skirt: {} chains, {} boundary edges, {} faces added ({} folded skipped)",
            self.chains, self.boundary_edges, self.faces_added, self.folded_skipped
        )
    }
}
