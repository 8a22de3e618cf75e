//! Atlas repacking: pack face-group regions, copy their pixels, remap uvs.

use image::RgbaImage;
use mesh_halfedge::Surface;
use tracing::{debug, info};

use crate::error::{AtlasError, AtlasResult};
use crate::group::{FaceGroup, PixelSpace, group_faces};
use crate::packer::GuillotinePacker;
use crate::params::AtlasParams;
use crate::rect::PixelRect;

/// One region of the source image and where it landed in the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureScissorRect {
    /// Index of the face group this region belongs to.
    pub group: usize,
    /// Region of the source image the group samples.
    pub source: PixelRect,
    /// `source` grown by the padding on every side.
    pub expanded: PixelRect,
    /// Where `expanded` was placed in the atlas (same size).
    pub placement: PixelRect,
}

impl TextureScissorRect {
    /// Translation from source pixels to atlas pixels.
    #[must_use]
    pub const fn offset(&self) -> (i64, i64) {
        (
            self.placement.min_x - self.expanded.min_x,
            self.placement.min_y - self.expanded.min_y,
        )
    }

    /// The unpadded source region at its atlas position.
    #[must_use]
    pub const fn relocated_source(&self) -> PixelRect {
        let (dx, dy) = self.offset();
        self.source.translated(dx, dy)
    }
}

/// Result of [`pack_texture_atlas`].
#[derive(Debug, Clone)]
pub struct PackedAtlas {
    /// The packed atlas image.
    pub image: RgbaImage,
    /// Placed regions, in packing order.
    pub rects: Vec<TextureScissorRect>,
    /// Vertices whose texture coordinates were rewritten.
    pub remapped_vertices: usize,
}

impl PackedAtlas {
    /// Atlas width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Atlas height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fraction of atlas pixels covered by unpadded source regions.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn fill_ratio(&self) -> f64 {
        let total = u64::from(self.width()) * u64::from(self.height());
        if total == 0 {
            return 0.0;
        }
        let used: i64 = self.rects.iter().map(|r| r.source.area()).sum();
        used as f64 / total as f64
    }
}

impl std::fmt::Display for PackedAtlas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Atlas: {}x{} px, {} regions ({:.1}% filled), {} vertices remapped",
            self.width(),
            self.height(),
            self.rects.len(),
            self.fill_ratio() * 100.0,
            self.remapped_vertices
        )
    }
}

/// Repack the texture regions a surface samples into a new, tighter atlas.
///
/// Faces are grouped by shared vertices, groups whose source regions touch
/// are merged, and each group's region is packed (largest first) with a
/// border of `params.padding` pixels filled by repeating the region's edge
/// pixels. Texture coordinates of the grouped vertices are moved to the
/// region's new place and clamped inside it so filtering cannot reach a
/// neighbour.
///
/// A surface without textured faces yields an empty atlas and is left
/// unchanged.
///
/// # Errors
///
/// Returns [`AtlasError::EmptyImage`] if `source` has no pixels and
/// [`AtlasError::AtlasTooLarge`] if the packed atlas cannot be addressed.
///
/// # Example
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use mesh_atlas::{pack_texture_atlas, AtlasParams};
/// use mesh_halfedge::build_topology;
/// use mesh_types::grid_plane;
///
/// let mut surface = build_topology(&grid_plane(2, 2.0, 0.0)).unwrap();
/// let source = RgbaImage::from_pixel(32, 32, Rgba([200, 10, 10, 255]));
///
/// let atlas = pack_texture_atlas(&mut surface, &source, &AtlasParams::default()).unwrap();
/// assert_eq!((atlas.width(), atlas.height()), (36, 36));
/// assert_eq!(atlas.image.get_pixel(0, 0), &Rgba([200, 10, 10, 255]));
/// ```
pub fn pack_texture_atlas(
    surface: &mut Surface,
    source: &RgbaImage,
    params: &AtlasParams,
) -> AtlasResult<PackedAtlas> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(AtlasError::EmptyImage { width, height });
    }

    let space = PixelSpace::new(width, height, params.v_up);
    let groups = group_faces(surface, space);
    if groups.is_empty() {
        debug!("No textured faces, atlas is empty");
        return Ok(PackedAtlas {
            image: RgbaImage::new(0, 0),
            rects: Vec::new(),
            remapped_vertices: 0,
        });
    }

    let rects = place_regions(&groups, i64::from(params.padding))?;

    let bounds = rects
        .iter()
        .fold(PixelRect::default(), |b, r| b.union(&r.placement));
    let too_large = || AtlasError::AtlasTooLarge {
        width: bounds.max_x,
        height: bounds.max_y,
    };
    let atlas_w = u32::try_from(bounds.max_x).map_err(|_| too_large())?;
    let atlas_h = u32::try_from(bounds.max_y).map_err(|_| too_large())?;

    let mut image = RgbaImage::new(atlas_w, atlas_h);
    for rect in &rects {
        copy_region(source, &mut image, rect);
    }

    let atlas_space = PixelSpace::new(atlas_w, atlas_h, params.v_up);
    let remapped_vertices = remap_uvs(surface, &groups, &rects, space, atlas_space);

    let packed = PackedAtlas {
        image,
        rects,
        remapped_vertices,
    };
    info!(%packed, source_width = width, source_height = height, "Packed texture atlas");

    Ok(packed)
}

/// Pack every group's padded region, largest first.
fn place_regions(groups: &[FaceGroup], padding: i64) -> AtlasResult<Vec<TextureScissorRect>> {
    let mut order: Vec<usize> = (0..groups.len()).collect();
    order.sort_by_key(|&i| {
        let e = groups[i].source.expanded(padding);
        (std::cmp::Reverse(e.area()), std::cmp::Reverse(e.height()), i)
    });

    let mut packer = GuillotinePacker::new();
    let mut rects = Vec::with_capacity(groups.len());
    for group in order {
        let source = groups[group].source;
        let expanded = source.expanded(padding);
        let size = |v: i64| {
            u32::try_from(v).map_err(|_| AtlasError::AtlasTooLarge {
                width: expanded.width(),
                height: expanded.height(),
            })
        };
        let placement = packer.insert(size(expanded.width())?, size(expanded.height())?);
        rects.push(TextureScissorRect {
            group,
            source,
            expanded,
            placement,
        });
    }
    Ok(rects)
}

/// Copy a region into its placement, filling the padding by clamping
/// reads to the source region's edge.
fn copy_region(source: &RgbaImage, atlas: &mut RgbaImage, rect: &TextureScissorRect) {
    let src = rect.source;
    for ty in 0..rect.placement.height() {
        let sy = (rect.expanded.min_y + ty).clamp(src.min_y, src.max_y - 1);
        for tx in 0..rect.placement.width() {
            let sx = (rect.expanded.min_x + tx).clamp(src.min_x, src.max_x - 1);
            let Some(&pixel) = pixel_at(sx, sy).and_then(|(x, y)| source.get_pixel_checked(x, y))
            else {
                continue;
            };
            let target = pixel_at(rect.placement.min_x + tx, rect.placement.min_y + ty)
                .and_then(|(x, y)| atlas.get_pixel_mut_checked(x, y));
            if let Some(slot) = target {
                *slot = pixel;
            }
        }
    }
}

fn pixel_at(x: i64, y: i64) -> Option<(u32, u32)> {
    Some((u32::try_from(x).ok()?, u32::try_from(y).ok()?))
}

/// Move texture coordinates of every grouped vertex into the atlas.
#[allow(clippy::cast_precision_loss)]
fn remap_uvs(
    surface: &mut Surface,
    groups: &[FaceGroup],
    rects: &[TextureScissorRect],
    source: PixelSpace,
    atlas: PixelSpace,
) -> usize {
    let mut done = vec![false; surface.vertices().len()];
    let mut remapped = 0;

    for rect in rects {
        let (dx, dy) = rect.offset();
        let target = rect.relocated_source();
        let (lo_x, hi_x) = (target.min_x as f64, target.max_x as f64);
        let (lo_y, hi_y) = (target.min_y as f64, target.max_y as f64);

        for &f in &groups[rect.group].faces {
            for v in surface.face_vertices(f) {
                if std::mem::replace(&mut done[v.index()], true) {
                    continue;
                }
                let Some(uv) = surface[v].attributes.uv else {
                    continue;
                };
                if !uv.x.is_finite() || !uv.y.is_finite() {
                    continue;
                }
                let (x, y) = source.to_pixel(&uv);
                let x = (x + dx as f64).clamp(lo_x, hi_x);
                let y = (y + dy as f64).clamp(lo_y, hi_y);
                surface[v].attributes.uv = Some(atlas.to_uv(x, y));
                remapped += 1;
            }
        }
    }
    remapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use image::Rgba;
    use mesh_halfedge::build_topology;
    use mesh_types::{IndexedMesh, Vertex, grid_plane};

    /// Quadrant colours: red top-left, green top-right, blue bottom-left,
    /// white bottom-right.
    fn quadrants(size: u32) -> RgbaImage {
        RgbaImage::from_fn(size, size, |x, y| match (x < size / 2, y < size / 2) {
            (true, true) => Rgba([255, 0, 0, 255]),
            (false, true) => Rgba([0, 255, 0, 255]),
            (true, false) => Rgba([0, 0, 255, 255]),
            (false, false) => Rgba([255, 255, 255, 255]),
        })
    }

    /// A triangle sampling the top-left quadrant and one sampling the
    /// bottom-right, with `v` growing downward.
    fn corner_islands() -> IndexedMesh {
        IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0).with_uv(0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0).with_uv(0.25, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0).with_uv(0.0, 0.25),
                Vertex::from_coords(5.0, 0.0, 0.0).with_uv(0.75, 0.75),
                Vertex::from_coords(6.0, 0.0, 0.0).with_uv(1.0, 0.75),
                Vertex::from_coords(5.0, 1.0, 0.0).with_uv(0.75, 1.0),
            ],
            vec![[0, 1, 2], [3, 4, 5]],
        )
    }

    #[test]
    fn islands_are_packed_side_by_side() {
        let mut s = build_topology(&corner_islands()).unwrap();
        let params = AtlasParams::tight().with_v_up(false);
        let atlas = pack_texture_atlas(&mut s, &quadrants(16), &params).unwrap();

        assert_eq!(atlas.rects.len(), 2);
        assert_eq!(atlas.width() * atlas.height(), 32);
        assert_relative_eq!(atlas.fill_ratio(), 1.0);
        assert!(!atlas.rects[0].placement.overlaps(&atlas.rects[1].placement));

        // Each island brings its own colour along
        for rect in &atlas.rects {
            let (x, y) = (rect.placement.min_x as u32, rect.placement.min_y as u32);
            let expected = if rect.source.min_x == 0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            };
            assert_eq!(atlas.image.get_pixel(x, y), &expected);
        }
    }

    #[test]
    fn uvs_follow_their_region() {
        let mut s = build_topology(&corner_islands()).unwrap();
        let params = AtlasParams::tight().with_v_up(false);
        let atlas = pack_texture_atlas(&mut s, &quadrants(16), &params).unwrap();
        let (w, h) = (f64::from(atlas.width()), f64::from(atlas.height()));

        for (_, v) in s.live_vertices() {
            let uv = v.attributes.uv.unwrap();
            assert!((0.0..=1.0).contains(&uv.x) && (0.0..=1.0).contains(&uv.y));
        }

        // The white island's far corner maps to its placement's far corner
        let white = atlas.rects.iter().find(|r| r.source.min_x == 12).unwrap();
        let corner = s
            .live_vertices()
            .find(|(_, v)| v.position.x == 6.0)
            .map(|(_, v)| v.attributes.uv.unwrap())
            .unwrap();
        assert_relative_eq!(corner.x * w, white.placement.max_x as f64, epsilon = 1e-9);
        assert_relative_eq!(corner.y * h, white.placement.min_y as f64, epsilon = 1e-9);
    }

    #[test]
    fn padding_repeats_edge_pixels() {
        let mut s = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
        let source = quadrants(8);
        let atlas = pack_texture_atlas(&mut s, &source, &AtlasParams::default().with_padding(3)).unwrap();

        assert_eq!((atlas.width(), atlas.height()), (14, 14));
        let rect = atlas.rects[0];
        assert_eq!(rect.expanded, PixelRect::new(-3, -3, 11, 11));
        assert_eq!(rect.relocated_source(), PixelRect::new(3, 3, 11, 11));

        // Corners of the border copy the corner pixels of the source
        assert_eq!(atlas.image.get_pixel(0, 0), source.get_pixel(0, 0));
        assert_eq!(atlas.image.get_pixel(13, 13), source.get_pixel(7, 7));
        assert_eq!(atlas.image.get_pixel(13, 0), source.get_pixel(7, 0));
        // Interior is a straight copy
        assert_eq!(atlas.image.get_pixel(3 + 5, 3 + 2), source.get_pixel(5, 2));
    }

    #[test]
    fn padded_uvs_stay_inside_relocated_source() {
        let mut s = build_topology(&grid_plane(3, 3.0, 0.0)).unwrap();
        let atlas = pack_texture_atlas(&mut s, &quadrants(30), &AtlasParams::default()).unwrap();
        let target = atlas.rects[0].relocated_source();
        let (w, h) = (f64::from(atlas.width()), f64::from(atlas.height()));

        assert_eq!(atlas.remapped_vertices, 16);
        for (_, v) in s.live_vertices() {
            let uv = v.attributes.uv.unwrap();
            let (x, y) = (uv.x * w, (1.0 - uv.y) * h);
            assert!(x >= target.min_x as f64 - 1e-9 && x <= target.max_x as f64 + 1e-9);
            assert!(y >= target.min_y as f64 - 1e-9 && y <= target.max_y as f64 + 1e-9);
        }
    }

    #[test]
    fn untextured_surface_gives_empty_atlas() {
        let mut s = build_topology(&mesh_types::unit_cube()).unwrap();
        let atlas = pack_texture_atlas(&mut s, &quadrants(4), &AtlasParams::default()).unwrap();
        assert!(atlas.rects.is_empty());
        assert_eq!(atlas.width(), 0);
        assert_eq!(atlas.remapped_vertices, 0);
    }

    #[test]
    fn empty_image_is_rejected() {
        let mut s = build_topology(&grid_plane(1, 1.0, 0.0)).unwrap();
        let result = pack_texture_atlas(&mut s, &RgbaImage::new(0, 4), &AtlasParams::default());
        assert!(matches!(result, Err(AtlasError::EmptyImage { width: 0, height: 4 })));
    }
}
