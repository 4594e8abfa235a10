//! Per-cell attribute keys
//!
//! Formatting and semantic flags are stored in a string-keyed map on each cell. Keys are
//! unique and order carries no meaning; a `BTreeMap` keeps serialized output stable.

use std::collections::BTreeMap;

/// String-keyed formatting / semantic flags of a cell
pub type Attributes = BTreeMap<String, String>;

/// Number format, stored as `<format>` or `<format>:<subformat>`
pub const NUMBER_FORMAT: &str = "numberFormat";
/// Separator between a number format and its subformat
pub const NUMBER_FORMAT_DELIMITER: char = ':';

pub const BOLD: &str = "bold";
pub const ITALIC: &str = "italic";
pub const UNDERLINE: &str = "underline";
pub const STRIKETHROUGH: &str = "strikethrough";

/// Horizontal alignment: `left`, `center` or `right`
pub const ALIGN: &str = "align";
/// Vertical alignment: `top`, `middle` or `bottom`
pub const VERTICAL_ALIGN: &str = "verticalAlign";

pub const BORDER_TOP: &str = "borderTop";
pub const BORDER_RIGHT: &str = "borderRight";
pub const BORDER_BOTTOM: &str = "borderBottom";
pub const BORDER_LEFT: &str = "borderLeft";

/// Background color (CSS color text)
pub const BACKGROUND: &str = "background";
/// Font color (CSS color text)
pub const FONT_COLOR: &str = "color";
pub const FONT_SIZE: &str = "fontSize";

pub const ROW_SPAN: &str = "rowSpan";
pub const COL_SPAN: &str = "colSpan";
/// A1 address of the merge root a covered cell belongs to
pub const MERGED_INTO: &str = "mergedInto";

pub const PROTECTED: &str = "protected";
/// Opaque widget payload
pub const WIDGET: &str = "widget";

/// Value stored for boolean flags
pub const TRUE: &str = "true";

/// Every border key, clockwise from the top
pub const BORDERS: [&str; 4] = [BORDER_TOP, BORDER_RIGHT, BORDER_BOTTOM, BORDER_LEFT];

/// Join a number format and optional subformat into the stored attribute value
pub fn join_number_format(format: &str, subformat: Option<&str>) -> String {
    match subformat {
        Some(sub) if !sub.is_empty() => format!("{}{}{}", format, NUMBER_FORMAT_DELIMITER, sub),
        _ => format.to_string(),
    }
}

/// Split a stored number format into format and subformat.
///
/// Only the first delimiter separates; the subformat may itself contain `:` (times).
pub fn split_number_format(value: &str) -> (&str, Option<&str>) {
    match value.split_once(NUMBER_FORMAT_DELIMITER) {
        Some((format, sub)) => (format, Some(sub)),
        None => (value, None),
    }
}

/// Whether a flag attribute is set
pub fn is_set(attributes: &Attributes, key: &str) -> bool {
    attributes.get(key).map_or(false, |v| v == TRUE)
}
