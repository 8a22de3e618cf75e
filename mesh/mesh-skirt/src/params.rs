//! Skirt parameters.

use crate::error::{SkirtError, SkirtResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for [`make_skirt`](crate::make_skirt).
///
/// # Example
///
/// ```
/// use mesh_skirt::SkirtParams;
///
/// let params = SkirtParams::new(2.5);
/// assert_eq!(params.height, 2.5);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkirtParams {
    /// Distance the skirt extends from the boundary.
    /// Default: `1.0`
    pub height: f64,

    /// Averaged boundary normals shorter than this count as cancelled and
    /// produce no skirt at that vertex.
    /// Default: `1e-6`
    pub cancel_epsilon: f64,
}

impl Default for SkirtParams {
    fn default() -> Self {
        Self {
            height: 1.0,
            cancel_epsilon: 1e-6,
        }
    }
}

impl SkirtParams {
    /// Skirt of the given height.
    #[must_use]
    pub fn new(height: f64) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    /// Skirt sized from a tile's geometric error.
    ///
    /// Seams between neighbouring tiles open by at most about the larger of
    /// their geometric errors, so the skirt covers twice that.
    #[must_use]
    pub fn for_geometric_error(error: f64) -> Self {
        Self::new(error * 2.0)
    }

    /// Set the cancellation epsilon.
    #[must_use]
    pub const fn with_cancel_epsilon(mut self, epsilon: f64) -> Self {
        self.cancel_epsilon = epsilon;
        self
    }

    /// Check the height and epsilon.
    ///
    /// # Errors
    ///
    /// Returns [`SkirtError::InvalidHeight`] or [`SkirtError::InvalidEpsilon`].
    pub fn validate(&self) -> SkirtResult<()> {
        if !self.height.is_finite() || self.height <= 0.0 {
            return Err(SkirtError::InvalidHeight(self.height));
        }
        if !self.cancel_epsilon.is_finite() || self.cancel_epsilon < 0.0 {
            return Err(SkirtError::InvalidEpsilon(self.cancel_epsilon));
        }
        Ok(())
    }
}
