//! Cut parameters.

use mesh_types::Axis;

use crate::error::{CutError, CutResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An axis-aligned cutting plane and its crossing tolerance.
///
/// # Example
///
/// ```
/// use mesh_cut::CutParams;
/// use mesh_types::Axis;
///
/// let params = CutParams::new(Axis::X, 0.5).with_epsilon(1e-6);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CutParams {
    /// Axis the plane is perpendicular to.
    pub axis: Axis,

    /// Plane position along `axis`.
    pub coordinate: f64,

    /// An edge crosses only when one end is below `coordinate - epsilon`
    /// and the other above `coordinate + epsilon`.
    /// Default: `1e-9`
    pub epsilon: f64,
}

impl Default for CutParams {
    fn default() -> Self {
        Self {
            axis: Axis::X,
            coordinate: 0.0,
            epsilon: 1e-9,
        }
    }
}

impl CutParams {
    /// Plane at `coordinate` along `axis` with the default epsilon.
    #[must_use]
    pub fn new(axis: Axis, coordinate: f64) -> Self {
        Self {
            axis,
            coordinate,
            ..Self::default()
        }
    }

    /// Set the crossing epsilon.
    #[must_use]
    pub const fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check the plane and epsilon.
    ///
    /// # Errors
    ///
    /// Returns [`CutError::NonFiniteCoordinate`] or
    /// [`CutError::InvalidEpsilon`].
    pub fn validate(&self) -> CutResult<()> {
        if !self.coordinate.is_finite() {
            return Err(CutError::NonFiniteCoordinate(self.coordinate));
        }
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(CutError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}
