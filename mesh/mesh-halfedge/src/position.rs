//! Spatial hash over vertex positions.

use hashbrown::HashMap;
use mesh_types::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How two half-edge endpoints are considered "the same" when pairing twins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TwinMatch {
    /// Endpoints match when they are the same vertex.
    #[default]
    Identity,
    /// Endpoints match when their positions fall in the same welded group.
    ///
    /// A tolerance of `0.0` groups bit-identical positions only.
    Position {
        /// Maximum distance between grouped positions.
        tolerance: f64,
    },
}

type CellKey = (i64, i64, i64);

/// Spatial hash answering "is there an already-inserted point near here?".
///
/// With a positive tolerance, points are bucketed into cubic cells of edge
/// `2 × tolerance` and a query scans the 3×3×3 neighbourhood. With a zero
/// tolerance the bucket key is the exact bit pattern of the coordinates.
///
/// # Example
///
/// ```
/// use mesh_halfedge::PositionIndex;
/// use mesh_types::Point3;
///
/// let mut index = PositionIndex::new(0.01);
/// index.insert(0, Point3::new(0.0, 0.0, 0.0));
///
/// assert_eq!(index.find(&Point3::new(0.005, 0.0, 0.0), |_| true), Some(0));
/// assert_eq!(index.find(&Point3::new(0.5, 0.0, 0.0), |_| true), None);
/// ```
#[derive(Debug, Clone)]
pub struct PositionIndex {
    tolerance: f64,
    cells: HashMap<CellKey, Vec<(u32, Point3<f64>)>>,
}

impl PositionIndex {
    /// Create an empty index. Negative or non-finite tolerances act as `0`.
    #[must_use]
    pub fn new(tolerance: f64) -> Self {
        let tolerance = if tolerance.is_finite() && tolerance > 0.0 {
            tolerance
        } else {
            0.0
        };
        Self {
            tolerance,
            cells: HashMap::new(),
        }
    }

    /// Tolerance in use.
    #[must_use]
    pub const fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Add a point under `key`.
    pub fn insert(&mut self, key: u32, position: Point3<f64>) {
        let cell = self.cell_of(&position);
        self.cells.entry(cell).or_default().push((key, position));
    }

    /// First inserted key within tolerance of `position` accepted by `accept`.
    ///
    /// Candidates are visited in insertion order within each cell.
    pub fn find(&self, position: &Point3<f64>, mut accept: impl FnMut(u32) -> bool) -> Option<u32> {
        let cell = self.cell_of(position);

        if self.tolerance == 0.0 {
            return self.cells.get(&cell).and_then(|bucket| {
                bucket
                    .iter()
                    .find(|(key, p)| p == position && accept(*key))
                    .map(|(key, _)| *key)
            });
        }

        let tol_sq = self.tolerance * self.tolerance;
        let mut best: Option<u32> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let neighbor = (cell.0 + dx, cell.1 + dy, cell.2 + dz);
                    let Some(bucket) = self.cells.get(&neighbor) else {
                        continue;
                    };
                    for &(key, p) in bucket {
                        if best.is_some_and(|b| b <= key) {
                            continue;
                        }
                        if (p - position).norm_squared() <= tol_sq && accept(key) {
                            best = Some(key);
                        }
                    }
                }
            }
        }
        best
    }

    /// Assign every position the index of its group representative.
    ///
    /// Positions are visited in order; each one joins the earliest
    /// representative within tolerance, otherwise it becomes a
    /// representative itself. The result is deterministic and never chains
    /// groups wider than the tolerance.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_halfedge::PositionIndex;
    /// use mesh_types::Point3;
    ///
    /// let points = [
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 0.0, 0.0),
    /// ];
    /// assert_eq!(PositionIndex::group(&points, 0.0), vec![0, 1, 0]);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    // Truncation is acceptable: surfaces address vertices with u32 ids
    pub fn group(positions: &[Point3<f64>], tolerance: f64) -> Vec<u32> {
        let mut index = Self::new(tolerance);
        let mut groups = Vec::with_capacity(positions.len());
        for (i, p) in positions.iter().enumerate() {
            if let Some(rep) = index.find(p, |_| true) {
                groups.push(rep);
            } else {
                index.insert(i as u32, *p);
                groups.push(i as u32);
            }
        }
        groups
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    // Cell coordinates and bit patterns only serve as hash keys
    fn cell_of(&self, p: &Point3<f64>) -> CellKey {
        if self.tolerance == 0.0 {
            // +0.0 and -0.0 compare equal, so they must share a bucket
            let bits = |x: f64| if x == 0.0 { 0 } else { x.to_bits() as i64 };
            return (bits(p.x), bits(p.y), bits(p.z));
        }
        let cell_size = self.tolerance * 2.0;
        (
            (p.x / cell_size).floor() as i64,
            (p.y / cell_size).floor() as i64,
            (p.z / cell_size).floor() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_mode_distinguishes_tiny_offsets() {
        let points = [
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(1.0 + 1e-12, 2.0, 3.0),
            Point3::new(1.0, 2.0, 3.0),
        ];
        assert_eq!(PositionIndex::group(&points, 0.0), vec![0, 1, 0]);
    }

    #[test]
    fn signed_zero_groups_together() {
        let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(-0.0, 0.0, -0.0)];
        assert_eq!(PositionIndex::group(&points, 0.0), vec![0, 0]);
    }

    #[test]
    fn tolerance_mode_groups_across_cells() {
        // 0.019 and 0.021 straddle a cell border for tolerance 0.01 (cell 0.02)
        let points = [Point3::new(0.019, 0.0, 0.0), Point3::new(0.021, 0.0, 0.0)];
        assert_eq!(PositionIndex::group(&points, 0.01), vec![0, 0]);
    }

    #[test]
    fn groups_do_not_chain() {
        let points = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.008, 0.0, 0.0),
            Point3::new(0.016, 0.0, 0.0),
        ];
        // Third point is 0.016 from the representative: its own group
        assert_eq!(PositionIndex::group(&points, 0.01), vec![0, 0, 2]);
    }

    #[test]
    fn find_prefers_lowest_key_and_respects_filter() {
        let mut index = PositionIndex::new(0.1);
        index.insert(5, Point3::new(0.0, 0.0, 0.0));
        index.insert(2, Point3::new(0.05, 0.0, 0.0));
        let p = Point3::new(0.02, 0.0, 0.0);
        assert_eq!(index.find(&p, |_| true), Some(2));
        assert_eq!(index.find(&p, |k| k != 2), Some(5));
        assert_eq!(index.find(&p, |_| false), None);
    }

    #[test]
    fn invalid_tolerance_falls_back_to_exact() {
        assert!(PositionIndex::new(-1.0).tolerance().abs() < f64::EPSILON);
        assert!(PositionIndex::new(f64::NAN).tolerance().abs() < f64::EPSILON);
    }
}
