//! Coordinate axes.

use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the three coordinate axes.
///
/// Tile boundaries are axis-aligned planes, so cutting and skirting only
/// ever need to name an axis plus a coordinate along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// The X axis (west/east).
    X,
    /// The Y axis (south/north).
    Y,
    /// The Z axis (height).
    Z,
}

impl Axis {
    /// All three axes in X, Y, Z order.
    pub const ALL: [Self; 3] = [Self::X, Self::Y, Self::Z];

    /// Component index of this axis (0, 1 or 2).
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }

    /// Read this axis' coordinate of a point.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::{Axis, Point3};
    ///
    /// let p = Point3::new(1.0, 2.0, 3.0);
    /// assert_eq!(Axis::Y.coord(&p), 2.0);
    /// ```
    #[inline]
    #[must_use]
    pub fn coord(self, point: &Point3<f64>) -> f64 {
        point[self.index()]
    }

    /// Unit vector along this axis.
    #[must_use]
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Self::X => Vector3::x(),
            Self::Y => Vector3::y(),
            Self::Z => Vector3::z(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_index_matches_components() {
        let p = Point3::new(4.0, 5.0, 6.0);
        for axis in Axis::ALL {
            assert!((axis.coord(&p) - p[axis.index()]).abs() < f64::EPSILON);
            assert!((axis.unit().norm() - 1.0).abs() < f64::EPSILON);
        }
    }
}
