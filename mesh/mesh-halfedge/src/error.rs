//! Error types for half-edge construction.

use thiserror::Error;

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

/// Errors that can occur while building a half-edge surface.
///
/// Structural problems found in an existing surface are not errors; they are
/// reported through [`TopologyReport`](crate::TopologyReport).
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index} (mesh has {vertex_count} vertices)")]
    InvalidIndex {
        /// Index of the offending face.
        face: usize,
        /// The invalid vertex index.
        index: u32,
        /// Total number of vertices in the mesh.
        vertex_count: usize,
    },

    /// Position matching tolerance is negative or not finite.
    #[error("invalid position tolerance {0} (must be finite and >= 0)")]
    InvalidTolerance(f64),

    /// The mesh has more elements than `u32` ids can address.
    #[error("mesh too large: {count} {kind} exceed the u32 id space")]
    TooLarge {
        /// Element kind ("vertices", "half-edges", "faces").
        kind: &'static str,
        /// Element count requested.
        count: usize,
    },
}
