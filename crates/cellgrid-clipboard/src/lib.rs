//! # cellgrid-clipboard
//!
//! Clipboard codec for cellgrid.
//!
//! Copying writes a plain-text flavor (tab separated rendered values) and an HTML flavor
//! carrying formulas, attributes and merges. Pasting reads back our own HTML as well as
//! Excel, Google Sheets, generic HTML tables, paragraphs and plain text.

mod css;
mod dialect;
mod error;
mod excel;
pub mod html;
mod model;
mod options;
mod parse;
mod r1c1;
mod serialize;
mod spans;
mod tile;
mod values;

pub use css::{attributes_to_style, declarations_to_attributes, parse_declarations, StyleSheet};
pub use dialect::{decode_number_format, decode_typed_value, encode_typed_value};
pub use error::{ClipboardError, ClipboardResult};
pub use excel::{is_excel_document, strip_graphics};
pub use model::{ClipboardCell, ClipboardPayload, ClipboardSource, ParsedClipboard, PasteUpdates};
pub use options::{CopyOptions, PasteOptions};
pub use parse::{parse_clipboard, parse_plain_text};
pub use r1c1::{translate_r1c1, try_translate_r1c1};
pub use serialize::{plain_text, serialize_selection};
pub use spans::{normalize_spans, table_column_count, Slot};
pub use tile::tile_cells;
pub use values::{coerce_value, CoercedValue};

/// HTML attribute names of the clipboard dialect
pub mod attributes {
    pub use crate::dialect::{
        ATTRIBUTES, CUT_ID, FORMULA, MARKER, MARKER_CELL, MARKER_TABLE, ORIGIN, SHEETS_FORMULA,
        SHEETS_NUMBER_FORMAT, SHEETS_VALUE,
    };
}
