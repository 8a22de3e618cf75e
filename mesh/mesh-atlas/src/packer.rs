//! Guillotine rectangle packer with a growing atlas.

use tracing::trace;

use crate::rect::PixelRect;

/// Packs rectangles into an atlas that grows on demand.
///
/// The packer keeps a set of free rectangles, all disjoint from every placed
/// rectangle, and the running bounds of everything placed so far. Each
/// placement consumes one free rectangle and splits its L-shaped leftover
/// into two new ones with a single straight cut. When no free rectangle can
/// host a request, a new one is synthesized beside or below the current
/// bounds, so insertion never fails.
///
/// # Example
///
/// ```
/// use mesh_atlas::GuillotinePacker;
///
/// let mut packer = GuillotinePacker::new();
/// let a = packer.insert(100, 50);
/// let b = packer.insert(50, 100);
/// let c = packer.insert(30, 30);
///
/// assert!(!a.overlaps(&b) && !a.overlaps(&c) && !b.overlaps(&c));
/// assert!(packer.bounds().area() >= 100 * 50 + 50 * 100 + 30 * 30);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GuillotinePacker {
    free: Vec<PixelRect>,
    bounds: PixelRect,
}

impl GuillotinePacker {
    /// Empty packer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds of everything placed so far, anchored at the origin.
    #[must_use]
    pub const fn bounds(&self) -> PixelRect {
        self.bounds
    }

    /// Unused space inside the bounds.
    #[must_use]
    pub fn free_rects(&self) -> &[PixelRect] {
        &self.free
    }

    /// Place a `width` x `height` rectangle and return where it went.
    ///
    /// A zero-sized request returns an empty rectangle at the origin and
    /// leaves the packer untouched.
    pub fn insert(&mut self, width: u32, height: u32) -> PixelRect {
        let (w, h) = (i64::from(width), i64::from(height));
        if w == 0 || h == 0 {
            return PixelRect::default();
        }

        let host = match self.choose_host(w, h) {
            Some(i) => i,
            None => self.grow(w, h),
        };

        let free = self.free.swap_remove(host);
        let placed = PixelRect::from_size(free.min_x, free.min_y, w, h);
        self.split(&free, &placed);
        self.bounds = self.bounds.union(&placed);

        trace!(%placed, free_rects = self.free.len(), "Placed rectangle");
        placed
    }

    /// Index of the free rectangle to place into, if any can host.
    fn choose_host(&self, w: i64, h: i64) -> Option<usize> {
        let fits = |r: &PixelRect| r.width() >= w && r.height() >= h;

        if let [only] = self.free.as_slice() {
            return fits(only).then_some(0);
        }

        let mut best: Option<(usize, i64, i64)> = None;
        for (i, r) in self.free.iter().enumerate() {
            if !fits(r) {
                continue;
            }
            if r.width() == w && r.height() == h {
                return Some(i);
            }
            let grown = self
                .bounds
                .union(&PixelRect::from_size(r.min_x, r.min_y, w, h))
                .area();
            // Equal growth: the tighter host leaves less wasted sliver
            let waste = r.area() - w * h;
            if best.is_none_or(|(_, g, wst)| grown < g || (grown == g && waste < wst)) {
                best = Some((i, grown, waste));
            }
        }
        best.map(|(i, _, _)| i)
    }

    /// Add a free rectangle beyond the current bounds large enough for
    /// `w` x `h` and return its index.
    ///
    /// The atlas grows to the right or downward, whichever yields the
    /// smaller bounds. Space the growth adds beside the old bounds is
    /// registered as free too.
    fn grow(&mut self, w: i64, h: i64) -> usize {
        if self.bounds.is_empty() {
            self.free.push(PixelRect::from_size(0, 0, w, h));
            return self.free.len() - 1;
        }

        let (bw, bh) = (self.bounds.max_x, self.bounds.max_y);
        let right_area = (bw + w) * bh.max(h);
        let below_area = bw.max(w) * (bh + h);

        let (host, gap) = if right_area < below_area || (right_area == below_area && bw <= bh) {
            (
                PixelRect::from_size(bw, 0, w, bh.max(h)),
                PixelRect::new(0, bh, bw, bh.max(h)),
            )
        } else {
            (
                PixelRect::from_size(0, bh, bw.max(w), h),
                PixelRect::new(bw, 0, bw.max(w), bh),
            )
        };
        trace!(%host, "Growing atlas");

        if !gap.is_empty() {
            self.free.push(gap);
        }
        self.free.push(host);
        self.free.len() - 1
    }

    /// Split the leftover of `free` after `placed` into at most two free
    /// rectangles.
    fn split(&mut self, free: &PixelRect, placed: &PixelRect) {
        let leftover_w = free.width() - placed.width();
        let leftover_h = free.height() - placed.height();

        let (right, below) = if leftover_w < leftover_h {
            // Horizontal cut: the strip below spans the full width
            (
                PixelRect::new(placed.max_x, free.min_y, free.max_x, placed.max_y),
                PixelRect::new(free.min_x, placed.max_y, free.max_x, free.max_y),
            )
        } else {
            // Vertical cut: the strip to the right spans the full height
            (
                PixelRect::new(placed.max_x, free.min_y, free.max_x, free.max_y),
                PixelRect::new(free.min_x, placed.max_y, placed.max_x, free.max_y),
            )
        };

        self.free
            .extend([right, below].into_iter().filter(|r| !r.is_empty()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_disjoint(rects: &[PixelRect]) {
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{a} overlaps {b}");
            }
        }
    }

    #[test]
    fn first_insert_sits_at_origin() {
        let mut p = GuillotinePacker::new();
        let r = p.insert(64, 32);
        assert_eq!(r, PixelRect::from_size(0, 0, 64, 32));
        assert_eq!(p.bounds(), r);
        assert!(p.free_rects().is_empty());
    }

    #[test]
    fn three_rectangles_do_not_overlap() {
        let mut p = GuillotinePacker::new();
        let placed = vec![p.insert(100, 50), p.insert(50, 100), p.insert(30, 30)];

        assert_disjoint(&placed);
        let bounds = p.bounds();
        assert!(bounds.area() >= 100 * 50 + 50 * 100 + 30 * 30);
        for r in &placed {
            assert!(bounds.contains(r));
        }
        assert_eq!(placed[0].width(), 100);
        assert_eq!(placed[1].height(), 100);
    }

    #[test]
    fn leftover_space_is_reused() {
        let mut p = GuillotinePacker::new();
        p.insert(100, 100);
        p.insert(10, 200);
        let bounds = p.bounds();

        // Fits in the strip below the first rectangle
        let small = p.insert(50, 50);
        assert_eq!(p.bounds(), bounds);
        assert!(bounds.contains(&small));
    }

    #[test]
    fn exact_fit_is_preferred() {
        let mut p = GuillotinePacker::new();
        p.insert(100, 60);
        // Grows to the right and frees the 100x40 strip under the first
        p.insert(40, 100);
        assert_eq!(p.free_rects(), &[PixelRect::new(0, 60, 100, 100)]);

        // Leaves 70x40 to the right and 30x30 below
        p.insert(30, 10);
        let r = p.insert(30, 30);
        assert_eq!(r, PixelRect::from_size(0, 70, 30, 30));
        assert_eq!(p.bounds(), PixelRect::new(0, 0, 140, 100));
    }

    #[test]
    fn free_rects_stay_disjoint_from_placements() {
        let mut p = GuillotinePacker::new();
        let mut placed = Vec::new();
        for (w, h) in [(30, 10), (5, 40), (12, 12), (60, 4), (7, 7), (20, 25)] {
            placed.push(p.insert(w, h));
        }
        assert_disjoint(&placed);
        for f in p.free_rects() {
            assert!(p.bounds().contains(f));
            for r in &placed {
                assert!(!f.overlaps(r));
            }
        }
    }

    #[test]
    fn zero_size_is_ignored() {
        let mut p = GuillotinePacker::new();
        assert!(p.insert(0, 10).is_empty());
        assert!(p.bounds().is_empty());
    }
}
