//! # cellgrid-core
//!
//! Grid model for the cellgrid spreadsheet engine.
//!
//! This crate provides the types and pure operations behind the grid surface:
//! - [`CellAddress`] and [`parse_address`] - A1, tuple and notebook addressing
//! - [`Grid`] and [`GridCell`] - The dense cell array with merge metadata
//! - [`SheetSelection`] and [`SelectionRectangle`] - Selections and their normalized form
//! - [`merge`] - Merging, unmerging and merge-aware selection growth
//! - [`navigate`] - Ctrl+Arrow and arrow-key movement over visible indices
//! - [`autofill`] - Fill-handle drag extension and fill targets
//!
//! ## Example
//!
//! ```rust
//! use cellgrid_core::{merge_range, expand_selection_for_merges, Grid, SheetSelection};
//!
//! let mut grid = Grid::from_expressions(&[&["a", "b", "c"], &["d", "e", "f"]]);
//! merge_range(&mut grid, &SheetSelection::parse("A1:B2").unwrap()).unwrap();
//!
//! // Touching any cell of the block grows the selection over all of it
//! let grown = expand_selection_for_merges(&SheetSelection::parse("B2:C2").unwrap(), &grid);
//! assert_eq!(grown.to_a1_string(), "A1:C2");
//! ```

pub mod autofill;
pub mod cell;
pub mod direction;
pub mod error;
pub mod formula;
pub mod merge;
pub mod navigate;
pub mod selection;
pub mod update;

// Re-exports for convenience
pub use autofill::{
    compute_fill_target_range, dominant_direction, extend_along_one_axis, fill_series,
    format_number, plan_fill, FillDirection, FillTarget,
};
pub use cell::{
    attributes, column_to_index, format_address, index_to_column, parse_address, Attributes,
    CellAddress, ColumnPrefix, Grid, GridCell, ParsedAddress, SheetAddress,
};
pub use direction::{Axis, Direction, Step};
pub use error::{Error, Result};
pub use formula::{shift_formula_references, REF_ERROR};
pub use merge::{
    expand_selection_for_merges, freeze_would_split_merge, merge_block, merge_blocks,
    merge_range, merge_range_with_panes, merge_straddles_freeze, push_past_merged_edge, root_of,
    unmerge_range, validate_merges, FrozenPanes, MergeOutcome, MergeRoot,
};
pub use navigate::{is_filled, move_by_one, skip_to_block_boundary};
pub use selection::{
    format_range, normalize, parse_range, rectangles_equal, selections_equal, RectangleCells,
    SelectionRectangle, SheetSelection,
};
pub use update::{AttributeUpdate, ValueUpdate};

/// Maximum number of rows in a sheet
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a sheet
pub const MAX_COLS: u32 = 16_384;
