//! Face grouping by connectivity and texture-space locality.

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use mesh_halfedge::{FaceId, Surface};
use mesh_types::Point2;
use tracing::{debug, trace};

use crate::rect::PixelRect;
use crate::union_find::{UnionFind, index_u32};

/// Faces that move through the atlas as one piece.
#[derive(Debug, Clone)]
pub(crate) struct FaceGroup {
    /// Member faces in id order.
    pub faces: Vec<FaceId>,
    /// Pixels of the source image the faces sample.
    pub source: PixelRect,
}

/// Maps texture coordinates to source pixel space and back.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PixelSpace {
    pub width: f64,
    pub height: f64,
    pub v_up: bool,
}

impl PixelSpace {
    pub(crate) fn new(width: u32, height: u32, v_up: bool) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
            v_up,
        }
    }

    /// Continuous pixel position of a texture coordinate.
    pub(crate) fn to_pixel(self, uv: &Point2<f64>) -> (f64, f64) {
        let v = if self.v_up { 1.0 - uv.y } else { uv.y };
        (uv.x * self.width, v * self.height)
    }

    /// Texture coordinate of a continuous pixel position.
    pub(crate) fn to_uv(self, x: f64, y: f64) -> Point2<f64> {
        let v = y / self.height;
        Point2::new(x / self.width, if self.v_up { 1.0 - v } else { v })
    }
}

/// Partition live faces into groups that can be relocated independently.
///
/// Faces sharing a vertex are grouped first. Groups whose source pixel
/// rectangles overlap or touch are then merged until no two touch, so a
/// region sampled by two groups is copied exactly once. Groups without any
/// texture coordinates are dropped.
pub(crate) fn group_faces(surface: &Surface, space: PixelSpace) -> Vec<FaceGroup> {
    let faces: Vec<FaceId> = surface.live_faces().map(|(f, _)| f).collect();

    let mut sets = UnionFind::new(faces.len());
    let mut first_face: Vec<Option<u32>> = vec![None; surface.vertices().len()];
    for (i, &f) in faces.iter().enumerate() {
        let i = index_u32(i);
        for v in surface.face_vertices(f) {
            match first_face[v.index()] {
                Some(j) => {
                    sets.union(i, j);
                }
                None => first_face[v.index()] = Some(i),
            }
        }
    }

    let mut by_root: HashMap<u32, Vec<FaceId>> = HashMap::new();
    for (i, &f) in faces.iter().enumerate() {
        by_root.entry(sets.find(index_u32(i))).or_default().push(f);
    }
    let connected = by_root.len();

    let groups: Vec<FaceGroup> = by_root
        .into_values()
        .filter_map(|faces| {
            let source = source_rect(surface, &faces, space)?;
            Some(FaceGroup { faces, source })
        })
        .collect();
    let mut groups = merge_touching(groups);

    for g in &mut groups {
        g.faces.sort_unstable();
    }
    groups.sort_by_key(|g| g.faces.first().copied());

    debug!(connected, groups = groups.len(), "Grouped faces for atlas");
    groups
}

/// Pixel rectangle covering every texture coordinate of `faces`, clamped
/// to the image and at least one pixel wide and tall.
#[allow(clippy::cast_possible_truncation)]
fn source_rect(surface: &Surface, faces: &[FaceId], space: PixelSpace) -> Option<PixelRect> {
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);

    let uvs = faces
        .iter()
        .flat_map(|&f| surface.face_vertices(f))
        .filter_map(|v| surface[v].attributes.uv)
        .filter(|uv| uv.x.is_finite() && uv.y.is_finite());
    for uv in uvs {
        let (x, y) = space.to_pixel(&uv);
        min = (min.0.min(x), min.1.min(y));
        max = (max.0.max(x), max.1.max(y));
    }
    if !min.0.is_finite() {
        return None;
    }

    let (w, h) = (space.width as i64, space.height as i64);
    let span = |lo: f64, hi: f64, limit: i64| {
        let lo = (lo.floor() as i64).clamp(0, limit - 1);
        let hi = (hi.ceil() as i64).clamp(lo + 1, limit);
        (lo, hi)
    };
    let (min_x, max_x) = span(min.0, max.0, w);
    let (min_y, max_y) = span(min.1, max.1, h);
    Some(PixelRect::new(min_x, min_y, max_x, max_y))
}

/// Merge groups whose rectangles touch until none do.
///
/// Each round sweeps the rectangles in order of `min_x`, so only pairs that
/// overlap in x are compared. A merged rectangle can reach a group neither
/// part touched, hence the rounds.
fn merge_touching(mut groups: Vec<FaceGroup>) -> Vec<FaceGroup> {
    loop {
        let count = groups.len();
        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by_key(|&i| groups[i].source.min_x);

        let mut sets = UnionFind::new(count);
        for (k, &i) in order.iter().enumerate() {
            let a = &groups[i].source;
            for &j in &order[k + 1..] {
                let b = &groups[j].source;
                if b.min_x > a.max_x {
                    break;
                }
                if a.touches(b) {
                    sets.union(index_u32(i), index_u32(j));
                }
            }
        }

        let mut merged: HashMap<u32, FaceGroup> = HashMap::with_capacity(count);
        for (i, group) in groups.into_iter().enumerate() {
            match merged.entry(sets.find(index_u32(i))) {
                Entry::Occupied(mut slot) => {
                    let into = slot.get_mut();
                    into.source = into.source.union(&group.source);
                    into.faces.extend(group.faces);
                }
                Entry::Vacant(slot) => {
                    slot.insert(group);
                }
            }
        }

        groups = merged.into_values().collect();
        if groups.len() == count {
            return groups;
        }
        trace!(before = count, after = groups.len(), "Merged touching face groups");
    }
}
