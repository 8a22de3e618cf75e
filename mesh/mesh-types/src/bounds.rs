//! Axis-aligned bounding box.

use crate::Axis;
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box (AABB).
///
/// Besides mesh bounds, an `Aabb` describes a tile's footprint: its min/max
/// X and Y sides are the west/east and south/north tile boundaries.
///
/// # Example
///
/// ```
/// use mesh_types::{Aabb, Point3};
///
/// let aabb = Aabb::new(
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(10.0, 10.0, 10.0),
/// );
///
/// assert_eq!(aabb.size(), Point3::new(10.0, 10.0, 10.0).coords);
/// assert!(aabb.contains(&Point3::new(5.0, 5.0, 5.0)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner (smallest x, y, z values).
    pub min: Point3<f64>,
    /// Maximum corner (largest x, y, z values).
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a new AABB from two corners, ordering components per axis.
    #[must_use]
    pub fn new(a: Point3<f64>, b: Point3<f64>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Create an empty AABB (min > max), the identity for expansion.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Point3};
    ///
    /// let mut aabb = Aabb::empty();
    /// assert!(aabb.is_empty());
    ///
    /// aabb.expand_to_include(&Point3::new(1.0, 2.0, 3.0));
    /// assert!(!aabb.is_empty());
    /// ```
    #[must_use]
    #[allow(clippy::missing_const_for_fn)] // Point3::new is not const in nalgebra
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Create an AABB from an iterator of points.
    ///
    /// Returns an empty AABB if the iterator is empty.
    #[must_use]
    pub fn from_points<'a>(points: impl Iterator<Item = &'a Point3<f64>>) -> Self {
        let mut aabb = Self::empty();
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Check if the AABB is empty (min > max on some axis).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Width, depth and height of the box.
    #[inline]
    #[must_use]
    pub fn size(&self) -> Vector3<f64> {
        self.max - self.min
    }

    /// Center of the box.
    #[inline]
    #[must_use]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// Lower bound along `axis`.
    #[inline]
    #[must_use]
    pub fn min_along(&self, axis: Axis) -> f64 {
        axis.coord(&self.min)
    }

    /// Upper bound along `axis`.
    #[inline]
    #[must_use]
    pub fn max_along(&self, axis: Axis) -> f64 {
        axis.coord(&self.max)
    }

    /// Check if a point is inside or on the boundary.
    #[inline]
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Compute the union (enclosing AABB) of two AABBs.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Expand the AABB to include a point.
    pub fn expand_to_include(&mut self, point: &Point3<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Expand the AABB by a uniform margin on all sides.
    ///
    /// Negative margins shrink the box.
    #[must_use]
    pub fn expanded(&self, margin: f64) -> Self {
        let m = Vector3::repeat(margin);
        Self {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Split the box at `coordinate` along `axis` into the lower and upper part.
    ///
    /// The coordinate is clamped into the box, so one half may be flat.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Aabb, Axis, Point3};
    ///
    /// let tile = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 4.0, 1.0));
    /// let (west, east) = tile.split_at(Axis::X, 1.0);
    /// assert_eq!(west.max.x, 1.0);
    /// assert_eq!(east.min.x, 1.0);
    /// ```
    #[must_use]
    pub fn split_at(&self, axis: Axis, coordinate: f64) -> (Self, Self) {
        let c = coordinate.clamp(self.min_along(axis), self.max_along(axis));
        let mut lower = *self;
        let mut upper = *self;
        lower.max[axis.index()] = c;
        upper.min[axis.index()] = c;
        (lower, upper)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::empty()
    }
}
