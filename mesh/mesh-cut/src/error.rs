//! Error types for plane cutting.

use thiserror::Error;

/// Errors that can occur when configuring a cut.
#[derive(Debug, Error)]
pub enum CutError {
    /// The plane coordinate is NaN or infinite.
    #[error("Cut plane coordinate must be finite, got {0}")]
    NonFiniteCoordinate(f64),

    /// The crossing epsilon is negative or not finite.
    #[error("Invalid cut epsilon: {0} (must be finite and >= 0)")]
    InvalidEpsilon(f64),
}

/// Result type for cut operations.
pub type CutResult<T> = std::result::Result<T, CutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CutError::NonFiniteCoordinate(f64::INFINITY);
        assert!(format!("{err}").contains("inf"));

        let err = CutError::InvalidEpsilon(-0.5);
        assert!(format!("{err}").contains("-0.5"));
    }
}
