//! Parameters for mesh decimation.

use crate::error::{DecimateError, DecimateResult};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for one decimation pass (one level of detail).
///
/// # Example
///
/// ```
/// use mesh_decimate::{DecimateParams, IterationOverride};
///
/// let params = DecimateParams::default()
///     .with_max_diff_angle_deg(8.0)
///     .with_iterations(4)
///     .with_override(IterationOverride::new(0).with_max_diff_angle_deg(2.0));
///
/// assert!(params.validate().is_ok());
/// assert_eq!(params.thresholds(0).max_diff_angle_deg, 2.0);
/// assert_eq!(params.thresholds(1).max_diff_angle_deg, 8.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecimateParams {
    /// Largest allowed change of a face normal, in degrees.
    /// Default: `10.0`
    pub max_diff_angle_deg: f64,

    /// Edges shorter than this skip the normal and aspect tests.
    /// Default: `0.0`
    pub hedge_min_length: f64,

    /// Largest allowed turn of a neighbouring frontier edge when a boundary
    /// vertex moves, in degrees.
    /// Default: `5.0`
    pub frontier_max_diff_angle_deg: f64,

    /// Largest allowed aspect ratio of a reshaped triangle.
    /// Default: `10.0`
    pub max_aspect_ratio: f64,

    /// Cap on collapses for the whole pass. `None` means no cap.
    /// Default: `None`
    pub max_collapses: Option<usize>,

    /// Maximum number of sweeps.
    /// Default: `10`
    pub iterations: usize,

    /// Below this length the angle threshold is relaxed quadratically.
    /// `0.0` disables the relaxation.
    /// Default: `0.0`
    pub small_hedge_size: f64,

    /// Tolerance of the weld that closes each sweep.
    /// Default: `1e-9`
    pub weld_tolerance: f64,

    /// Seed for shuffling candidates before the length sort, which breaks
    /// ties between equal-length edges differently. `None` keeps arena order.
    /// Default: `None`
    pub shuffle_seed: Option<u64>,

    /// Threshold overrides for specific sweeps.
    /// Default: empty
    pub overrides: Vec<IterationOverride>,
}

impl Default for DecimateParams {
    fn default() -> Self {
        Self {
            max_diff_angle_deg: 10.0,
            hedge_min_length: 0.0,
            frontier_max_diff_angle_deg: 5.0,
            max_aspect_ratio: 10.0,
            max_collapses: None,
            iterations: 10,
            small_hedge_size: 0.0,
            weld_tolerance: 1e-9,
            shuffle_seed: None,
            overrides: Vec::new(),
        }
    }
}

impl DecimateParams {
    /// Keep nearly all visible detail: tight angles, boundaries barely move.
    #[must_use]
    pub fn conservative() -> Self {
        Self {
            max_diff_angle_deg: 3.0,
            frontier_max_diff_angle_deg: 1.0,
            max_aspect_ratio: 6.0,
            ..Default::default()
        }
    }

    /// Simplify hard for coarse levels of detail.
    #[must_use]
    pub fn aggressive() -> Self {
        Self {
            max_diff_angle_deg: 30.0,
            frontier_max_diff_angle_deg: 15.0,
            max_aspect_ratio: 30.0,
            iterations: 20,
            ..Default::default()
        }
    }

    /// Parameters for a level of detail with the given geometric error.
    ///
    /// Edges shorter than the error are collapsed without the normal test,
    /// and edges up to four times the error get a relaxed one.
    #[must_use]
    pub fn for_geometric_error(error: f64) -> Self {
        Self {
            hedge_min_length: error,
            small_hedge_size: error * 4.0,
            ..Default::default()
        }
    }

    /// Set the normal angle threshold.
    #[must_use]
    pub const fn with_max_diff_angle_deg(mut self, degrees: f64) -> Self {
        self.max_diff_angle_deg = degrees;
        self
    }

    /// Set the minimum tested edge length.
    #[must_use]
    pub const fn with_hedge_min_length(mut self, length: f64) -> Self {
        self.hedge_min_length = length;
        self
    }

    /// Set the frontier angle threshold.
    #[must_use]
    pub const fn with_frontier_max_diff_angle_deg(mut self, degrees: f64) -> Self {
        self.frontier_max_diff_angle_deg = degrees;
        self
    }

    /// Set the aspect ratio threshold.
    #[must_use]
    pub const fn with_max_aspect_ratio(mut self, ratio: f64) -> Self {
        self.max_aspect_ratio = ratio;
        self
    }

    /// Cap the number of collapses in the pass.
    #[must_use]
    pub const fn with_max_collapses(mut self, max: usize) -> Self {
        self.max_collapses = Some(max);
        self
    }

    /// Set the sweep count.
    #[must_use]
    pub const fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the small edge size.
    #[must_use]
    pub const fn with_small_hedge_size(mut self, size: f64) -> Self {
        self.small_hedge_size = size;
        self
    }

    /// Set the post-sweep weld tolerance.
    #[must_use]
    pub const fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Shuffle candidates with the given seed.
    #[must_use]
    pub const fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Add a per-iteration override.
    #[must_use]
    pub fn with_override(mut self, iteration: IterationOverride) -> Self {
        self.overrides.push(iteration);
        self
    }

    /// Thresholds in effect for sweep `iteration` (0-based).
    ///
    /// Later overrides for the same iteration win.
    #[must_use]
    pub fn thresholds(&self, iteration: usize) -> Thresholds {
        let mut t = Thresholds {
            max_diff_angle_deg: self.max_diff_angle_deg,
            hedge_min_length: self.hedge_min_length,
            frontier_max_diff_angle_deg: self.frontier_max_diff_angle_deg,
            max_aspect_ratio: self.max_aspect_ratio,
            small_hedge_size: self.small_hedge_size,
        };
        for o in self.overrides.iter().filter(|o| o.iteration == iteration) {
            if let Some(v) = o.max_diff_angle_deg {
                t.max_diff_angle_deg = v;
            }
            if let Some(v) = o.hedge_min_length {
                t.hedge_min_length = v;
            }
            if let Some(v) = o.frontier_max_diff_angle_deg {
                t.frontier_max_diff_angle_deg = v;
            }
            if let Some(v) = o.max_aspect_ratio {
                t.max_aspect_ratio = v;
            }
            if let Some(v) = o.small_hedge_size {
                t.small_hedge_size = v;
            }
        }
        t
    }

    /// Check every threshold, overrides included.
    ///
    /// # Errors
    ///
    /// Returns [`DecimateError::InvalidThreshold`] for a negative or NaN
    /// value and [`DecimateError::OverrideOutOfRange`] for an override past
    /// the last iteration.
    pub fn validate(&self) -> DecimateResult<()> {
        check("max_diff_angle_deg", self.max_diff_angle_deg)?;
        check("hedge_min_length", self.hedge_min_length)?;
        check("frontier_max_diff_angle_deg", self.frontier_max_diff_angle_deg)?;
        check("max_aspect_ratio", self.max_aspect_ratio)?;
        check("small_hedge_size", self.small_hedge_size)?;
        check("weld_tolerance", self.weld_tolerance)?;
        if !self.weld_tolerance.is_finite() {
            return Err(DecimateError::InvalidThreshold {
                name: "weld_tolerance",
                value: self.weld_tolerance,
            });
        }

        for o in &self.overrides {
            if o.iteration >= self.iterations {
                return Err(DecimateError::OverrideOutOfRange {
                    iteration: o.iteration,
                    iterations: self.iterations,
                });
            }
            let t = self.thresholds(o.iteration);
            check("max_diff_angle_deg", t.max_diff_angle_deg)?;
            check("hedge_min_length", t.hedge_min_length)?;
            check("frontier_max_diff_angle_deg", t.frontier_max_diff_angle_deg)?;
            check("max_aspect_ratio", t.max_aspect_ratio)?;
            check("small_hedge_size", t.small_hedge_size)?;
        }
        Ok(())
    }
}

fn check(name: &'static str, value: f64) -> DecimateResult<()> {
    if value.is_nan() || value < 0.0 {
        return Err(DecimateError::InvalidThreshold { name, value });
    }
    Ok(())
}

/// Threshold overrides for a single sweep.
///
/// Unset fields fall back to the pass-wide [`DecimateParams`] value.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IterationOverride {
    /// Sweep the override applies to (0-based).
    pub iteration: usize,
    /// Replacement normal angle threshold.
    pub max_diff_angle_deg: Option<f64>,
    /// Replacement minimum tested edge length.
    pub hedge_min_length: Option<f64>,
    /// Replacement frontier angle threshold.
    pub frontier_max_diff_angle_deg: Option<f64>,
    /// Replacement aspect ratio threshold.
    pub max_aspect_ratio: Option<f64>,
    /// Replacement small edge size.
    pub small_hedge_size: Option<f64>,
}

impl IterationOverride {
    /// Empty override for `iteration`.
    #[must_use]
    pub fn new(iteration: usize) -> Self {
        Self {
            iteration,
            ..Default::default()
        }
    }

    /// Override the normal angle threshold.
    #[must_use]
    pub const fn with_max_diff_angle_deg(mut self, degrees: f64) -> Self {
        self.max_diff_angle_deg = Some(degrees);
        self
    }

    /// Override the minimum tested edge length.
    #[must_use]
    pub const fn with_hedge_min_length(mut self, length: f64) -> Self {
        self.hedge_min_length = Some(length);
        self
    }

    /// Override the frontier angle threshold.
    #[must_use]
    pub const fn with_frontier_max_diff_angle_deg(mut self, degrees: f64) -> Self {
        self.frontier_max_diff_angle_deg = Some(degrees);
        self
    }

    /// Override the aspect ratio threshold.
    #[must_use]
    pub const fn with_max_aspect_ratio(mut self, ratio: f64) -> Self {
        self.max_aspect_ratio = Some(ratio);
        self
    }

    /// Override the small edge size.
    #[must_use]
    pub const fn with_small_hedge_size(mut self, size: f64) -> Self {
        self.small_hedge_size = Some(size);
        self
    }
}

/// Resolved thresholds for one sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Normal angle threshold in degrees.
    pub max_diff_angle_deg: f64,
    /// Minimum tested edge length.
    pub hedge_min_length: f64,
    /// Frontier angle threshold in degrees.
    pub frontier_max_diff_angle_deg: f64,
    /// Aspect ratio threshold.
    pub max_aspect_ratio: f64,
    /// Small edge size for angle relaxation.
    pub small_hedge_size: f64,
}

impl Thresholds {
    /// Factor applied to a face's normal change for an edge of `length`.
    ///
    /// `1.0` normally, `(length / small_hedge_size)²` for shorter edges.
    #[must_use]
    pub fn angle_factor(&self, length: f64) -> f64 {
        if self.small_hedge_size > 0.0 && length < self.small_hedge_size {
            let r = length / self.small_hedge_size;
            r * r
        } else {
            1.0
        }
    }
}
