//! Vertex types and attributes.

use nalgebra::{Point2, Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// RGBA color with 8-bit components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexColor {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255).
    pub a: u8,
}

impl VertexColor {
    /// Create an opaque color from RGB components.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::VertexColor;
    ///
    /// let red = VertexColor::new(255, 0, 0);
    /// assert_eq!(red.r, 255);
    /// assert_eq!(red.a, 255);
    /// ```
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a color from RGBA components.
    #[inline]
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Linear blend between two colors, `t` in `[0, 1]`.
    ///
    /// Used when a vertex is created on an edge between two colored vertices.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::VertexColor;
    ///
    /// let mid = VertexColor::BLACK.lerp(VertexColor::WHITE, 0.5);
    /// assert_eq!(mid.r, 128);
    /// ```
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // Truncation and sign loss are safe: the blend stays within [0, 255]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| f64::from(a).mul_add(1.0 - t, f64::from(b) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Black color (0, 0, 0).
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// White color (255, 255, 255).
    pub const WHITE: Self = Self::new(255, 255, 255);
}

impl Default for VertexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Optional attributes that can be attached to a vertex.
///
/// - `normal`: Computed from adjacent faces (area-weighted average)
/// - `uv`: Texture coordinate into the source texture of the batch
/// - `color`: Per-vertex color from the source model
/// - `batch_id`: Feature / material batch the vertex belongs to
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VertexAttributes {
    /// Unit normal vector.
    pub normal: Option<Vector3<f64>>,

    /// Texture coordinates (U, V), V growing downwards in image rows.
    pub uv: Option<Point2<f64>>,

    /// Vertex color.
    pub color: Option<VertexColor>,

    /// Batch identifier (feature table row, material group).
    pub batch_id: Option<u32>,
}

impl VertexAttributes {
    /// Create empty attributes with no values set.
    #[inline]
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            normal: None,
            uv: None,
            color: None,
            batch_id: None,
        }
    }

    /// Check if any attributes are set.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.normal.is_none() && self.uv.is_none() && self.color.is_none() && self.batch_id.is_none()
    }

    /// Interpolate attributes at parameter `t` along the segment `self -> other`.
    ///
    /// Continuous attributes (normal, uv, color) are blended when both ends
    /// carry them; the batch id is taken from `self`.
    #[must_use]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let normal = match (self.normal, other.normal) {
            (Some(a), Some(b)) => a.lerp(&b, t).try_normalize(f64::EPSILON).or(Some(a)),
            (a, _) => a,
        };
        let uv = match (self.uv, other.uv) {
            (Some(a), Some(b)) => Some(Point2::from(a.coords.lerp(&b.coords, t))),
            (a, _) => a,
        };
        let color = match (self.color, other.color) {
            (Some(a), Some(b)) => Some(a.lerp(b, t)),
            (a, _) => a,
        };
        Self {
            normal,
            uv,
            color,
            batch_id: self.batch_id,
        }
    }
}

/// A vertex in 3D space with optional attributes.
///
/// # Example
///
/// ```
/// use mesh_types::{Vertex, Point3};
///
/// let v1 = Vertex::new(Point3::new(1.0, 2.0, 3.0));
/// let v2 = Vertex::from_coords(1.0, 2.0, 3.0);
///
/// assert_eq!(v1.position, v2.position);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vertex {
    /// 3D position.
    pub position: Point3<f64>,

    /// Optional attributes (normal, uv, color, batch).
    pub attributes: VertexAttributes,
}

impl Vertex {
    /// Create a new vertex with only position set.
    #[inline]
    #[must_use]
    pub const fn new(position: Point3<f64>) -> Self {
        Self {
            position,
            attributes: VertexAttributes::empty(),
        }
    }

    /// Create a vertex from raw coordinates.
    #[inline]
    #[must_use]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Self::new(Point3::new(x, y, z))
    }

    /// Set the texture coordinate.
    ///
    /// # Example
    ///
    /// ```
    /// use mesh_types::Vertex;
    ///
    /// let v = Vertex::from_coords(0.0, 0.0, 0.0).with_uv(0.25, 0.75);
    /// assert_eq!(v.attributes.uv.map(|uv| uv.y), Some(0.75));
    /// ```
    #[must_use]
    pub fn with_uv(mut self, u: f64, v: f64) -> Self {
        self.attributes.uv = Some(Point2::new(u, v));
        self
    }

    /// Set the normal.
    #[must_use]
    pub const fn with_normal(mut self, normal: Vector3<f64>) -> Self {
        self.attributes.normal = Some(normal);
        self
    }

    /// Set the color.
    #[must_use]
    pub const fn with_color(mut self, color: VertexColor) -> Self {
        self.attributes.color = Some(color);
        self
    }

    /// Set the batch id.
    #[must_use]
    pub const fn with_batch_id(mut self, batch_id: u32) -> Self {
        self.attributes.batch_id = Some(batch_id);
        self
    }
}

impl From<Point3<f64>> for Vertex {
    fn from(position: Point3<f64>) -> Self {
        Self::new(position)
    }
}

impl From<[f64; 3]> for Vertex {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::from_coords(x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_builders() {
        let v = Vertex::from_coords(1.0, 2.0, 3.0)
            .with_uv(0.5, 0.5)
            .with_normal(Vector3::z())
            .with_color(VertexColor::BLACK)
            .with_batch_id(7);

        assert_eq!(v.attributes.batch_id, Some(7));
        assert_eq!(v.attributes.color, Some(VertexColor::BLACK));
        assert!(!v.attributes.is_empty());
    }

    #[test]
    fn vertex_from_array() {
        let v: Vertex = [1.0, 2.0, 3.0].into();
        assert!((v.position.z - 3.0).abs() < f64::EPSILON);
        assert!(v.attributes.is_empty());
    }

    #[test]
    fn color_lerp_endpoints() {
        let a = VertexColor::rgba(10, 20, 30, 40);
        let b = VertexColor::rgba(110, 120, 130, 140);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 2.0), b);
    }

    #[test]
    fn attributes_lerp_midpoint() {
        let a = VertexAttributes {
            uv: Some(Point2::new(0.0, 0.0)),
            normal: Some(Vector3::z()),
            batch_id: Some(3),
            ..VertexAttributes::empty()
        };
        let b = VertexAttributes {
            uv: Some(Point2::new(1.0, 0.5)),
            normal: Some(Vector3::z()),
            batch_id: Some(9),
            ..VertexAttributes::empty()
        };

        let mid = a.lerp(&b, 0.5);
        let uv = mid.uv.unwrap();
        assert!((uv.x - 0.5).abs() < 1e-12);
        assert!((uv.y - 0.25).abs() < 1e-12);
        assert_eq!(mid.batch_id, Some(3));
        assert!((mid.normal.unwrap().z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn attributes_lerp_missing_side_keeps_own() {
        let a = VertexAttributes {
            uv: Some(Point2::new(0.2, 0.2)),
            ..VertexAttributes::empty()
        };
        let b = VertexAttributes::empty();
        assert_eq!(a.lerp(&b, 0.5).uv, Some(Point2::new(0.2, 0.2)));
    }
}
