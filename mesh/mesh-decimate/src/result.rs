//! Result types for decimation operations.

// Triangle counts don't overflow in practice
#![allow(clippy::cast_precision_loss)]

/// Why candidate collapses were turned down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectionCounts {
    /// A reshaped triangle exceeded the aspect ratio threshold.
    pub aspect_ratio: usize,
    /// A triangle with area would have collapsed to none.
    pub collapsed_area: usize,
    /// A face normal would have turned too far.
    pub normal_angle: usize,
    /// A neighbouring frontier edge would have turned too far.
    pub frontier_angle: usize,
    /// The collapse would have made the surface non-manifold.
    pub topology: usize,
    /// A doomed duplicate on a texture seam had no partner at the survivor.
    pub seam: usize,
    /// Inconsistent references around the candidate (logged).
    pub structural: usize,
}

impl RejectionCounts {
    /// Sum of all counters.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.aspect_ratio
            + self.collapsed_area
            + self.normal_angle
            + self.frontier_angle
            + self.topology
            + self.seam
            + self.structural
    }

    pub(crate) fn add(&mut self, other: &Self) {
        self.aspect_ratio += other.aspect_ratio;
        self.collapsed_area += other.collapsed_area;
        self.normal_angle += other.normal_angle;
        self.frontier_angle += other.frontier_angle;
        self.topology += other.topology;
        self.seam += other.seam;
        self.structural += other.structural;
    }
}

/// Statistics of one decimation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecimationStats {
    /// Live faces before the pass.
    pub initial_faces: usize,

    /// Live faces after the pass.
    pub final_faces: usize,

    /// Collapses performed by each sweep, in order.
    pub collapses_per_iteration: Vec<usize>,

    /// Collapses of frontier edges, included in the per-sweep counts.
    pub boundary_collapses: usize,

    /// Rejections summed over all sweeps.
    pub rejected: RejectionCounts,

    /// Whether the pass stopped on `max_collapses`.
    pub hit_collapse_cap: bool,
}

impl DecimationStats {
    /// Total collapses over all sweeps.
    #[must_use]
    pub fn total_collapses(&self) -> usize {
        self.collapses_per_iteration.iter().sum()
    }

    /// Number of sweeps run.
    #[must_use]
    pub fn iterations_run(&self) -> usize {
        self.collapses_per_iteration.len()
    }

    /// Get the reduction ratio (final / initial).
    #[must_use]
    pub fn reduction_ratio(&self) -> f64 {
        if self.initial_faces == 0 {
            1.0
        } else {
            self.final_faces as f64 / self.initial_faces as f64
        }
    }

    /// Get the percentage of faces removed.
    #[must_use]
    pub fn reduction_percent(&self) -> f64 {
        (1.0 - self.reduction_ratio()) * 100.0
    }

    /// Check if any decimation occurred.
    #[must_use]
    pub fn was_decimated(&self) -> bool {
        self.total_collapses() > 0
    }
}

impl std::fmt::Display for DecimationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Decimation: {} → {} faces ({:.1}% reduction, {} collapses in {} sweeps, {} rejected)",
            self.initial_faces,
            self.final_faces,
            self.reduction_percent(),
            self.total_collapses(),
            self.iterations_run(),
            self.rejected.total(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(initial: usize, final_faces: usize, sweeps: Vec<usize>) -> DecimationStats {
        DecimationStats {
            initial_faces: initial,
            final_faces,
            collapses_per_iteration: sweeps,
            ..Default::default()
        }
    }

    #[test]
    fn test_reduction_ratio() {
        let s = stats(1000, 500, vec![200, 50]);
        assert!((s.reduction_ratio() - 0.5).abs() < 0.001);
        assert!((s.reduction_percent() - 50.0).abs() < 0.1);
        assert_eq!(s.total_collapses(), 250);
        assert_eq!(s.iterations_run(), 2);
    }

    #[test]
    fn test_was_decimated() {
        assert!(!stats(1000, 1000, vec![0]).was_decimated());
        assert!(stats(1000, 500, vec![250, 0]).was_decimated());
        assert!((DecimationStats::default().reduction_ratio() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_display() {
        let mut s = stats(1000, 500, vec![250]);
        s.rejected.normal_angle = 7;
        s.rejected.topology = 2;
        s.rejected.seam = 1;

        let display = format!("{s}");
        assert!(display.contains("1000"));
        assert!(display.contains("500"));
        assert!(display.contains("50.0%"));
        assert!(display.contains("10 rejected"));
    }
}
