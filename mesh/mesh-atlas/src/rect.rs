//! Integer pixel rectangles.

/// Half-open pixel rectangle `[min_x, max_x) x [min_y, max_y)`.
///
/// Rows grow downward, matching image memory order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelRect {
    /// Left column (inclusive).
    pub min_x: i64,
    /// Top row (inclusive).
    pub min_y: i64,
    /// Right column (exclusive).
    pub max_x: i64,
    /// Bottom row (exclusive).
    pub max_y: i64,
}

impl PixelRect {
    /// Rectangle from its corners.
    #[must_use]
    pub const fn new(min_x: i64, min_y: i64, max_x: i64, max_y: i64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Rectangle of the given size with its top-left corner at `(x, y)`.
    #[must_use]
    pub const fn from_size(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    /// Width in pixels (zero if inverted).
    #[must_use]
    pub const fn width(&self) -> i64 {
        if self.max_x > self.min_x {
            self.max_x - self.min_x
        } else {
            0
        }
    }

    /// Height in pixels (zero if inverted).
    #[must_use]
    pub const fn height(&self) -> i64 {
        if self.max_y > self.min_y {
            self.max_y - self.min_y
        } else {
            0
        }
    }

    /// Area in pixels.
    #[must_use]
    pub const fn area(&self) -> i64 {
        self.width() * self.height()
    }

    /// True when the rectangle covers no pixel.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// True when `other` lies entirely inside `self`.
    #[must_use]
    pub const fn contains(&self, other: &Self) -> bool {
        other.min_x >= self.min_x
            && other.min_y >= self.min_y
            && other.max_x <= self.max_x
            && other.max_y <= self.max_y
    }

    /// True when the interiors share at least one pixel.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.min_x < other.max_x
            && other.min_x < self.max_x
            && self.min_y < other.max_y
            && other.min_y < self.max_y
    }

    /// True when the rectangles overlap or share an edge or corner.
    #[must_use]
    pub const fn touches(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && other.min_x <= self.max_x
            && self.min_y <= other.max_y
            && other.min_y <= self.max_y
    }

    /// Smallest rectangle covering both. An empty rectangle is ignored.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        Self::new(
            self.min_x.min(other.min_x),
            self.min_y.min(other.min_y),
            self.max_x.max(other.max_x),
            self.max_y.max(other.max_y),
        )
    }

    /// Grow by `by` pixels on every side.
    #[must_use]
    pub const fn expanded(&self, by: i64) -> Self {
        Self::new(self.min_x - by, self.min_y - by, self.max_x + by, self.max_y + by)
    }

    /// Move by `(dx, dy)`.
    #[must_use]
    pub const fn translated(&self, dx: i64, dy: i64) -> Self {
        Self::new(self.min_x + dx, self.min_y + dy, self.max_x + dx, self.max_y + dy)
    }
}

impl std::fmt::Display for PixelRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} at ({}, {})",
            self.width(),
            self.height(),
            self.min_x,
            self.min_y
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size() {
        let r = PixelRect::from_size(2, 3, 10, 5);
        assert_eq!(r.width(), 10);
        assert_eq!(r.height(), 5);
        assert_eq!(r.area(), 50);
        assert!(!r.is_empty());
        assert!(PixelRect::new(5, 5, 5, 9).is_empty());
        assert_eq!(PixelRect::new(5, 5, 1, 1).area(), 0);
    }

    #[test]
    fn test_overlap_and_touch() {
        let a = PixelRect::from_size(0, 0, 10, 10);
        let right = PixelRect::from_size(10, 0, 5, 5);
        let corner = PixelRect::from_size(10, 10, 1, 1);
        let far = PixelRect::from_size(12, 0, 1, 1);

        assert!(!a.overlaps(&right));
        assert!(a.touches(&right));
        assert!(a.touches(&corner));
        assert!(!a.touches(&far));
        assert!(a.overlaps(&PixelRect::from_size(9, 9, 2, 2)));
    }

    #[test]
    fn test_union_and_contains() {
        let a = PixelRect::from_size(0, 0, 4, 4);
        let b = PixelRect::from_size(6, 2, 2, 8);
        let u = a.union(&b);
        assert_eq!(u, PixelRect::new(0, 0, 8, 10));
        assert!(u.contains(&a));
        assert!(u.contains(&b));
        assert_eq!(PixelRect::default().union(&b), b);
    }

    #[test]
    fn test_expand_translate() {
        let r = PixelRect::from_size(4, 4, 2, 2).expanded(2);
        assert_eq!(r, PixelRect::new(2, 2, 8, 8));
        assert_eq!(r.translated(-2, 3), PixelRect::new(0, 5, 6, 11));
        assert_eq!(format!("{r}"), "6x6 at (2, 2)");
    }
}
