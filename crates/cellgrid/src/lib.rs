//! # cellgrid
//!
//! A spreadsheet grid, selection and clipboard engine for browser hosts.
//!
//! cellgrid holds the logic behind a spreadsheet surface, independent of how it is drawn:
//!
//! ## Features
//!
//! - A1, `$A$1`, `[col,row,sheet]` and notebook-cell addressing
//! - Selection normalization and rectangle algebra
//! - Merged cells, with merge-aware selection growth and freeze-pane checks
//! - Ctrl+Arrow block navigation over visible rows and columns
//! - Autofill drags, fill targets and series continuation
//! - Copy to text and HTML; paste from our own HTML, Excel, Google Sheets, HTML tables,
//!   paragraphs and plain text
//!
//! ## Example
//!
//! ```rust
//! use cellgrid::prelude::*;
//!
//! let grid = Grid::from_expressions(&[&["1", "=A1*2"], &["3", "4"]]);
//! let payload = serialize_selection(
//!     &grid,
//!     &SheetSelection::parse("A1:B2").unwrap(),
//!     &CopyOptions::default(),
//! )
//! .unwrap();
//!
//! let parsed = parse_clipboard(
//!     Some(&payload.html),
//!     Some(&payload.text),
//!     &PasteOptions::at("C1".parse().unwrap()),
//! );
//! assert_eq!(parsed.source, ClipboardSource::Own);
//! assert_eq!(parsed.cell(0, 1).unwrap().expression, "=C1*2");
//! ```

pub mod edit;
pub mod prelude;

pub use edit::GridEditExt;

// Re-export core types
pub use cellgrid_core::{
    attributes,
    column_to_index,
    compute_fill_target_range,
    dominant_direction,
    expand_selection_for_merges,
    extend_along_one_axis,
    fill_series,
    format_address,
    format_number,
    format_range,
    freeze_would_split_merge,
    index_to_column,
    is_filled,
    merge_block,
    merge_blocks,
    merge_range,
    merge_range_with_panes,
    merge_straddles_freeze,
    move_by_one,
    normalize,
    parse_address,
    parse_range,
    plan_fill,
    push_past_merged_edge,
    rectangles_equal,
    root_of,
    selections_equal,
    shift_formula_references,
    skip_to_block_boundary,
    unmerge_range,
    validate_merges,
    AttributeUpdate,
    Attributes,
    Axis,
    CellAddress,
    ColumnPrefix,
    Direction,
    // Error types
    Error,
    FillDirection,
    FillTarget,
    FrozenPanes,
    // Main types
    Grid,
    GridCell,
    MergeOutcome,
    MergeRoot,
    ParsedAddress,
    RectangleCells,
    Result,
    SelectionRectangle,
    SheetAddress,
    SheetSelection,
    Step,
    ValueUpdate,
    // Constants
    MAX_COLS,
    MAX_ROWS,
    REF_ERROR,
};

// Re-export clipboard types
pub use cellgrid_clipboard::{
    coerce_value, parse_clipboard, parse_plain_text, serialize_selection, tile_cells,
    translate_r1c1, try_translate_r1c1, ClipboardCell, ClipboardError, ClipboardPayload,
    ClipboardResult, ClipboardSource, CopyOptions, ParsedClipboard, PasteOptions, PasteUpdates,
};
