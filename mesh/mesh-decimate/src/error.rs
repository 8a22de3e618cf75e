//! Error types for decimation.

use thiserror::Error;

/// Errors that can occur when configuring decimation.
///
/// Only caller mistakes are errors. Collapses rejected by a quality gate or
/// skipped over inconsistent topology are counted in
/// [`DecimationStats`](crate::DecimationStats) instead.
#[derive(Debug, Error)]
pub enum DecimateError {
    /// An angle, length or ratio threshold is negative or NaN.
    #[error("Invalid {name}: {value} (must be >= 0)")]
    InvalidThreshold {
        /// Name of the parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A per-iteration override targets an iteration that never runs.
    #[error("Override for iteration {iteration} but only {iterations} iterations are configured")]
    OverrideOutOfRange {
        /// Iteration the override targets.
        iteration: usize,
        /// Configured iteration count.
        iterations: usize,
    },
}

/// Result type for decimation operations.
pub type DecimateResult<T> = std::result::Result<T, DecimateError>;
