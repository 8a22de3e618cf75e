//! Error types for atlas packing.

use thiserror::Error;

/// Result type alias for atlas operations.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Errors that can occur while repacking a texture atlas.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The source image has no pixels.
    #[error("source image is empty ({width}x{height})")]
    EmptyImage {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
    },

    /// The packed atlas does not fit in an image.
    #[error("packed atlas of {width}x{height} pixels exceeds the image size limit")]
    AtlasTooLarge {
        /// Atlas width in pixels.
        width: i64,
        /// Atlas height in pixels.
        height: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AtlasError::EmptyImage {
            width: 0,
            height: 16,
        };
        assert!(err.to_string().contains("0x16"));

        let err = AtlasError::AtlasTooLarge {
            width: 1 << 40,
            height: 1,
        };
        assert!(err.to_string().contains("exceeds"));
    }
}
