//! Error types for Sandfall.

use thiserror::Error;

/// Top-level error type for Sandfall operations.
#[derive(Debug, Error)]
pub enum SandfallError {
    /// Grid construction errors
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Grid construction errors.
///
/// Runtime grid access never fails; only building a grid can.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Width or height was zero
    #[error("Grid dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Result type alias for Sandfall operations.
pub type SandfallResult<T> = Result<T, SandfallError>;
