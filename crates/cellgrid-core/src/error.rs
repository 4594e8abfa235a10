//! Error types for cellgrid-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellgrid-core
#[derive(Debug, Error)]
pub enum Error {
    /// Address string is not one of the recognized shapes
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// Invalid cell range for the requested operation
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// Coordinate outside the grid
    #[error("Cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: u32,
        col: u32,
        rows: u32,
        cols: u32,
    },

    /// Range partially overlaps an existing merged block
    #[error("Range {range} would split the merged block at {root}")]
    MergeConflict { range: String, root: String },

    /// Merge would straddle the frozen pane boundary
    #[error("Range {0} crosses the frozen pane boundary")]
    FrozenPaneConflict(String),
}
