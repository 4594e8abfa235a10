//! Copy and paste options

use cellgrid_core::{CellAddress, SheetSelection};

/// Options for serializing a selection to the clipboard
#[derive(Debug, Clone)]
pub struct CopyOptions {
    /// Separator between rows of the plain-text payload (default: newline)
    pub row_separator: String,
    /// Separator between cells of the plain-text payload (default: tab)
    pub column_separator: String,
    /// Id of the cut operation, when the copy is part of a cut
    pub cut_id: Option<String>,
    /// Emit the attribute blob and inline styles
    pub include_styles: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            row_separator: "\n".to_string(),
            column_separator: "\t".to_string(),
            cut_id: None,
            include_styles: true,
        }
    }
}

impl CopyOptions {
    /// Options for the copy half of a cut
    pub fn cut<S: Into<String>>(cut_id: S) -> Self {
        Self {
            cut_id: Some(cut_id.into()),
            ..Self::default()
        }
    }
}

/// Options for parsing clipboard content
#[derive(Debug, Clone)]
pub struct PasteOptions {
    /// Cell the paste lands on; relative references are resolved against it
    pub active_cell: CellAddress,
    /// Selection to tile the pasted block over, when larger than the block
    pub fill_selection: Option<SheetSelection>,
    /// Use the HTML payload when both HTML and text are available (default: true)
    pub prefer_html: bool,
}

impl Default for PasteOptions {
    fn default() -> Self {
        Self {
            active_cell: CellAddress::new(0, 0),
            fill_selection: None,
            prefer_html: true,
        }
    }
}

impl PasteOptions {
    /// Paste anchored at `active_cell`
    pub fn at(active_cell: CellAddress) -> Self {
        Self {
            active_cell,
            ..Self::default()
        }
    }
}
