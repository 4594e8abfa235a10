//! HTML attribute names and typed-value metadata
//!
//! Our own cells are marked with `data-cellgrid*` attributes. Typed values and number
//! formats use the `data-sheets-*` JSON encoding Google Sheets writes, so both sides can
//! read each other's clipboard.

use cellgrid_core::attributes::join_number_format;
use cellgrid_core::format_number;
use serde_json::{json, Value};

/// Marker attribute: `cell` on cells, `table` on the table of a multi-cell copy
pub const MARKER: &str = "data-cellgrid";
/// A1 formula of the cell as copied
pub const FORMULA: &str = "data-cellgrid-formula";
/// JSON object of the cell's attributes
pub const ATTRIBUTES: &str = "data-cellgrid-attributes";
/// Id of the cut this copy belongs to
pub const CUT_ID: &str = "data-cellgrid-cut";
/// A1 address of the copied block's top-left cell
pub const ORIGIN: &str = "data-cellgrid-origin";

/// Typed value: `{"1": type, "<type>": value}`
pub const SHEETS_VALUE: &str = "data-sheets-value";
/// Number format: `{"1": type, "2": pattern}`
pub const SHEETS_NUMBER_FORMAT: &str = "data-sheets-numberformat";
/// R1C1 formula
pub const SHEETS_FORMULA: &str = "data-sheets-formula";

pub const MARKER_CELL: &str = "cell";
pub const MARKER_TABLE: &str = "table";

const TYPE_TEXT: u64 = 2;
const TYPE_NUMBER: u64 = 3;
const TYPE_BOOLEAN: u64 = 4;

/// Encode a rendered value as typed-value JSON
///
/// Only text that reads back identically is typed as a number, so `007` or `1.50` stay
/// text.
pub fn encode_typed_value(value: &str) -> String {
    let typed = match value.parse::<f64>() {
        Ok(n) if n.is_finite() && format_number(n) == value => {
            json!({ "1": TYPE_NUMBER, "3": n })
        }
        _ => json!({ "1": TYPE_TEXT, "2": value }),
    };
    typed.to_string()
}

/// Decode typed-value JSON into expression text, `None` when malformed
pub fn decode_typed_value(json: &str) -> Option<String> {
    let value: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring malformed {} '{}': {}", SHEETS_VALUE, json, e);
            return None;
        }
    };

    match value.get("1").and_then(Value::as_u64)? {
        TYPE_TEXT => value.get("2").and_then(Value::as_str).map(str::to_string),
        TYPE_NUMBER => value.get("3").and_then(Value::as_f64).map(format_number),
        TYPE_BOOLEAN => value
            .get("4")
            .and_then(Value::as_bool)
            .map(|b| if b { "TRUE" } else { "FALSE" }.to_string()),
        _ => None,
    }
}

/// Decode number-format JSON into the stored `numberFormat` attribute value
pub fn decode_number_format(json: &str) -> Option<String> {
    let value: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Ignoring malformed {} '{}': {}", SHEETS_NUMBER_FORMAT, json, e);
            return None;
        }
    };

    let format = match value.get("1").and_then(Value::as_u64)? {
        2 => "number",
        3 => "percent",
        4 => "currency",
        5 => "date",
        6 => "time",
        7 => "datetime",
        8 => "scientific",
        _ => return None,
    };
    let pattern = value.get("2").and_then(Value::as_str);
    Some(join_number_format(format, pattern))
}
