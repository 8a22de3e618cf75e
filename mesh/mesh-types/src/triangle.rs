//! Triangle type for geometric calculations.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangle with concrete vertex positions.
///
/// Winding is **counter-clockwise (CCW) when viewed from the front**
/// (normal points toward viewer).
///
/// # Example
///
/// ```
/// use mesh_types::{Triangle, Point3};
///
/// let tri = Triangle::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// );
///
/// assert!((tri.area() - 0.5).abs() < 1e-10);
/// assert!((tri.normal_or_up().z - 1.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Triangle {
    /// First vertex.
    pub v0: Point3<f64>,
    /// Second vertex.
    pub v1: Point3<f64>,
    /// Third vertex.
    pub v2: Point3<f64>,
}

impl Triangle {
    /// Create a new triangle from three points.
    #[inline]
    #[must_use]
    pub const fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// Cross product of the two edges leaving `v0`.
    ///
    /// The magnitude equals twice the triangle's area.
    #[inline]
    #[must_use]
    pub fn normal_unnormalized(&self) -> Vector3<f64> {
        let e1 = self.v1 - self.v0;
        let e2 = self.v2 - self.v0;
        e1.cross(&e2)
    }

    /// Compute the unit face normal.
    ///
    /// Returns `None` for degenerate triangles (zero area).
    #[must_use]
    pub fn normal(&self) -> Option<Vector3<f64>> {
        self.normal_unnormalized().try_normalize(f64::EPSILON)
    }

    /// Unit face normal, or `+Z` for degenerate triangles.
    ///
    /// Tile meshes are height fields for the most part, so the vertical
    /// direction is the neutral choice when a face has no orientation.
    #[must_use]
    pub fn normal_or_up(&self) -> Vector3<f64> {
        self.normal().unwrap_or_else(Vector3::z)
    }

    /// Triangle area.
    #[inline]
    #[must_use]
    pub fn area(&self) -> f64 {
        self.normal_unnormalized().norm() * 0.5
    }

    /// Triangle centroid.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Edge lengths `[|v0v1|, |v1v2|, |v2v0|]`.
    #[must_use]
    pub fn edge_lengths(&self) -> [f64; 3] {
        [
            (self.v1 - self.v0).norm(),
            (self.v2 - self.v1).norm(),
            (self.v0 - self.v2).norm(),
        ]
    }

    /// Shortest edge length.
    #[must_use]
    pub fn min_edge_length(&self) -> f64 {
        let [a, b, c] = self.edge_lengths();
        a.min(b).min(c)
    }

    /// Longest edge length.
    #[must_use]
    pub fn max_edge_length(&self) -> f64 {
        let [a, b, c] = self.edge_lengths();
        a.max(b).max(c)
    }

    /// Compute the aspect ratio of the triangle.
    ///
    /// Aspect ratio is `longest_edge / shortest_altitude`. An equilateral
    /// triangle scores about 1.15; needles and slivers grow without bound.
    ///
    /// Returns `f64::INFINITY` for degenerate triangles (zero area).
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let sqrt3 = 3.0_f64.sqrt();
    /// let tri = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(2.0, 0.0, 0.0),
    ///     Point3::new(1.0, sqrt3, 0.0),
    /// );
    /// let ar = tri.aspect_ratio();
    /// assert!(ar > 1.1 && ar < 1.2);
    /// ```
    #[must_use]
    pub fn aspect_ratio(&self) -> f64 {
        let area = self.area();
        if area < f64::EPSILON {
            return f64::INFINITY;
        }

        let max_edge = self.max_edge_length();
        let shortest_altitude = 2.0 * area / max_edge;
        if shortest_altitude < f64::EPSILON {
            return f64::INFINITY;
        }

        max_edge / shortest_altitude
    }

    /// Angle in degrees between this triangle's normal and `other`'s.
    ///
    /// Degenerate triangles use the vertical fallback normal.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Triangle, Point3};
    ///
    /// let up = Triangle::new(
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// );
    /// let down = Triangle::new(up.v0, up.v2, up.v1);
    /// assert!((up.normal_angle_deg(&down) - 180.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn normal_angle_deg(&self, other: &Self) -> f64 {
        let a = self.normal_or_up();
        let b = other.normal_or_up();
        a.dot(&b).clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Check whether the triangle is degenerate.
    ///
    /// A triangle is degenerate if its area is below `area_threshold` or any
    /// two corners coincide exactly.
    #[must_use]
    pub fn is_degenerate(&self, area_threshold: f64) -> bool {
        self.v0 == self.v1 || self.v1 == self.v2 || self.v2 == self.v0 || self.area() < area_threshold
    }
}
