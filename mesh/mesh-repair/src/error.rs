//! Error types for surface repair parameters.

use thiserror::Error;

/// Result type for repair operations.
pub type RepairResult<T> = Result<T, RepairError>;

/// Errors reported when validating repair parameters.
///
/// The repair passes themselves never fail: invalid tolerances passed to
/// them directly are clamped and logged. Call
/// [`RepairParams::validate`](crate::RepairParams::validate) to reject bad
/// configuration up front.
#[derive(Debug, Error)]
pub enum RepairError {
    /// Weld tolerance is negative or not finite.
    #[error("invalid weld tolerance {0} (must be finite and >= 0)")]
    InvalidTolerance(f64),

    /// Degenerate area threshold is negative or not finite.
    #[error("invalid degenerate area threshold {0} (must be finite and >= 0)")]
    InvalidAreaThreshold(f64),
}
