//! Prelude module - common imports for cellgrid users
//!
//! ```rust
//! use cellgrid::prelude::*;
//! ```

pub use crate::{
    // Clipboard
    parse_clipboard,
    serialize_selection,
    ClipboardCell,
    ClipboardSource,
    CopyOptions,
    ParsedClipboard,
    PasteOptions,

    // Autofill
    compute_fill_target_range,
    extend_along_one_axis,
    FillDirection,
    FillTarget,

    // Merges and navigation
    expand_selection_for_merges,
    merge_range,
    skip_to_block_boundary,
    unmerge_range,
    Direction,
    FrozenPanes,

    // Main types
    CellAddress,
    Grid,
    GridCell,
    SelectionRectangle,
    SheetSelection,

    // Error types
    ClipboardError,
    Error,
    Result,

    // Extension traits
    GridEditExt,
};
