//! Atlas packing parameters.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for [`pack_texture_atlas`](crate::pack_texture_atlas).
///
/// # Example
///
/// ```
/// use mesh_atlas::AtlasParams;
///
/// let params = AtlasParams::default().with_padding(4);
/// assert_eq!(params.padding, 4);
/// assert!(params.v_up);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AtlasParams {
    /// Border, in pixels, grown around every region by repeating its edge
    /// pixels. Keeps mipmapping and bilinear filtering from sampling the
    /// neighbouring region.
    /// Default: `2`
    pub padding: u32,

    /// Texture coordinates have `v = 0` at the bottom row of the image.
    ///
    /// Set to `false` for coordinates that grow downward with pixel rows.
    /// Default: `true`
    pub v_up: bool,
}

impl Default for AtlasParams {
    fn default() -> Self {
        Self {
            padding: 2,
            v_up: true,
        }
    }
}

impl AtlasParams {
    /// Regions copied edge to edge, no border.
    #[must_use]
    pub fn tight() -> Self {
        Self {
            padding: 0,
            ..Self::default()
        }
    }

    /// Set the border width.
    #[must_use]
    pub const fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Set the vertical texture coordinate convention.
    #[must_use]
    pub const fn with_v_up(mut self, v_up: bool) -> Self {
        self.v_up = v_up;
        self
    }
}
