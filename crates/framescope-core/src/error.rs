//! Error types for framescope.

use thiserror::Error;

/// The main error type for framescope operations.
///
/// Scene protocol parsing never produces one of these: malformed fragments
/// degrade to default values instead. Errors surface only where a caller can
/// act on them (configuration loading, selection) or where a report of
/// skipped input is useful (OBJ faces).
#[derive(Error, Debug)]
pub enum FramescopeError {
    /// An OBJ face referenced a vertex that does not exist.
    #[error("face references vertex {reference}, but only {vertex_count} vertices are defined")]
    InvalidFaceReference {
        /// The 1-based reference as written in the file.
        reference: i64,
        /// Number of `v` lines in the file.
        vertex_count: usize,
    },

    /// An OBJ face reference could not be read as an integer.
    #[error("malformed face reference '{0}'")]
    MalformedFaceReference(String),

    /// A selection index outside the current frame's primitive list.
    #[error("selection index {index} out of range for a frame with {len} primitives")]
    SelectionOutOfRange { index: usize, len: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for framescope operations.
pub type Result<T> = std::result::Result<T, FramescopeError>;
