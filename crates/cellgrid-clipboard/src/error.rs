//! Clipboard error types

use thiserror::Error;

/// Result type for clipboard operations
pub type ClipboardResult<T> = std::result::Result<T, ClipboardError>;

/// Errors that can occur while copying
///
/// Pasting never fails: malformed input degrades to a smaller or empty result.
#[derive(Debug, Error)]
pub enum ClipboardError {
    /// Attribute blob could not be encoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Selection does not fit the grid
    #[error("Core error: {0}")]
    Core(#[from] cellgrid_core::Error),
}
