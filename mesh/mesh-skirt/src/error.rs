//! Error types for skirt operations.

use thiserror::Error;

/// Result type alias for skirt operations.
pub type SkirtResult<T> = Result<T, SkirtError>;

/// Errors that can occur during skirt generation.
#[derive(Debug, Error)]
pub enum SkirtError {
    /// Skirt height is zero, negative or not finite.
    #[error("invalid skirt height {0} (must be finite and > 0)")]
    InvalidHeight(f64),

    /// Cancellation epsilon is negative or not finite.
    #[error("invalid cancellation epsilon {0} (must be finite and >= 0)")]
    InvalidEpsilon(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SkirtError::InvalidHeight(0.0);
        assert!(err.to_string().contains("skirt height 0"));
    }
}
