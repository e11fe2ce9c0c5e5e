//! Error types for bvhkit

use thiserror::Error;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed hierarchy or motion syntax. Parsing stops at the first
    /// structural fault; no partial tree is returned.
    #[error("structure error at line {line}: {message}")]
    Structure { line: usize, message: String },

    /// Frame value count disagrees with the skeleton's channel total.
    #[error("frame {frame}: expected {expected} channel values, got {actual}")]
    Shape {
        frame: usize,
        expected: usize,
        actual: usize,
    },

    /// Frame index outside the motion table.
    #[error("frame index {index} out of range (motion has {len} frames)")]
    Range { index: usize, len: usize },

    /// Joint name not present in the skeleton.
    #[error("joint '{}' not found (available: {})", .name, .available.join(", "))]
    NotFound { name: String, available: Vec<String> },

    /// Invalid parameter to a file operation
    #[error("operation error: {0}")]
    Op(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
