//! Error types shared across the Lulu crates.

use thiserror::Error;

/// Errors raised while building common value types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommonError {
    /// A rectangle was given a negative or non-finite extent
    #[error("Invalid size: {width}x{height}")]
    InvalidSize {
        /// Requested width
        width: f32,
        /// Requested height
        height: f32,
    },

    /// A key name did not match any known key
    #[error("Unknown key name: {0}")]
    UnknownKey(String),

    /// A raw key code did not match any known key
    #[error("Unknown key code: {0}")]
    UnknownKeyCode(i32),
}

/// Result type alias for common operations.
pub type CommonResult<T> = Result<T, CommonError>;
