//! WebAssembly bindings for cellgrid
//!
//! This module provides wasm-bindgen-based bindings for the cellgrid engine, so the
//! browser host can run addressing, navigation, autofill and clipboard logic without a
//! round trip to a server.
//!
//! Grids cross the boundary as arrays of rows of cell objects
//! (`{expression, value, attributes, rowSpan, colSpan, mergedInto}`, all optional).
//! Selections and addresses cross as A1 strings.

use serde::Deserialize;
use wasm_bindgen::prelude::*;

use cellgrid::{
    compute_fill_target_range, extend_along_one_axis, format_address, format_range,
    parse_address, parse_clipboard, serialize_selection, skip_to_block_boundary, CellAddress,
    CopyOptions, Direction, Grid, GridCell, PasteOptions, SheetSelection,
};

// =============================================================================
// Error Conversion
// =============================================================================

fn to_js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

fn to_js_value<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn grid_from_js(cells: JsValue) -> Result<Grid, JsError> {
    let rows: Vec<Vec<GridCell>> = serde_wasm_bindgen::from_value(cells)
        .map_err(|e| JsError::new(&format!("Invalid grid: {}", e)))?;
    Ok(Grid::from_rows(rows))
}

fn selection_from_js(range: &str) -> Result<SheetSelection, JsError> {
    SheetSelection::parse(range).map_err(|e| JsError::new(&format!("Invalid range: {}", e)))
}

// =============================================================================
// Addressing
// =============================================================================

/// Parse an A1, `$A$1`, `[col,row,sheetId]` or notebook-cell address.
#[wasm_bindgen(js_name = parseAddress)]
pub fn parse_address_js(address: &str) -> Result<JsValue, JsError> {
    let parsed = parse_address(address).map_err(to_js_error)?;
    to_js_value(&parsed)
}

/// Format a zero-based coordinate in A1 form.
#[wasm_bindgen(js_name = formatAddress)]
pub fn format_address_js(
    col: u32,
    row: u32,
    col_absolute: Option<bool>,
    row_absolute: Option<bool>,
) -> String {
    format_address(
        col,
        row,
        col_absolute.unwrap_or(false),
        row_absolute.unwrap_or(false),
    )
}

// =============================================================================
// Clipboard
// =============================================================================

/// Paste options as passed from JavaScript
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct JsPasteOptions {
    active_cell: Option<String>,
    fill_selection: Option<String>,
    prefer_html: Option<bool>,
}

impl JsPasteOptions {
    fn into_options(self) -> Result<PasteOptions, JsError> {
        let mut options = PasteOptions::default();
        if let Some(active) = self.active_cell {
            options.active_cell = active.parse::<CellAddress>().map_err(to_js_error)?;
        }
        if let Some(range) = self.fill_selection {
            options.fill_selection = Some(selection_from_js(&range)?);
        }
        if let Some(prefer_html) = self.prefer_html {
            options.prefer_html = prefer_html;
        }
        Ok(options)
    }
}

/// Parse clipboard content into rows of cells (`null` for merge-covered slots).
#[wasm_bindgen(js_name = parseClipboard)]
pub fn parse_clipboard_js(
    html: Option<String>,
    text: Option<String>,
    options: JsValue,
) -> Result<JsValue, JsError> {
    let options: JsPasteOptions = if options.is_null() || options.is_undefined() {
        JsPasteOptions::default()
    } else {
        serde_wasm_bindgen::from_value(options).map_err(to_js_error)?
    };
    let parsed = parse_clipboard(html.as_deref(), text.as_deref(), &options.into_options()?);
    to_js_value(&parsed)
}

/// Serialize a selection of a grid to `{text, html}` clipboard flavors.
#[wasm_bindgen(js_name = serializeSelection)]
pub fn serialize_selection_js(
    cells: JsValue,
    range: &str,
    cut_id: Option<String>,
) -> Result<JsValue, JsError> {
    let grid = grid_from_js(cells)?;
    let options = CopyOptions {
        cut_id,
        ..CopyOptions::default()
    };
    let payload =
        serialize_selection(&grid, &selection_from_js(range)?, &options).map_err(to_js_error)?;
    to_js_value(&payload)
}

// =============================================================================
// Navigation and autofill
// =============================================================================

/// Ctrl+Arrow from `current` ("up", "down", "left" or "right"), returning the A1
/// address landed on.
#[wasm_bindgen(js_name = skipToBlockBoundary)]
pub fn skip_to_block_boundary_js(
    cells: JsValue,
    direction: &str,
    current: &str,
    visible: Vec<u32>,
) -> Result<String, JsError> {
    let grid = grid_from_js(cells)?;
    let direction: Direction = serde_wasm_bindgen::from_value(JsValue::from_str(direction))
        .map_err(|e| JsError::new(&format!("Invalid direction: {}", e)))?;
    let current: CellAddress = current.parse().map_err(to_js_error)?;

    let landed = skip_to_block_boundary(
        direction.axis(),
        direction.step(),
        &grid,
        current,
        &visible,
    );
    Ok(landed.end.to_string())
}

/// Autofill selection for dragging `range` to the cursor at `(row, col)`.
#[wasm_bindgen(js_name = extendAutofill)]
pub fn extend_autofill_js(range: &str, row: u32, col: u32) -> Result<String, JsError> {
    let original = selection_from_js(range)?;
    Ok(format_range(&extend_along_one_axis(&original, row, col)))
}

/// Block an autofill must populate, or `null` when the selection did not grow.
#[wasm_bindgen(js_name = computeFillTargetRange)]
pub fn compute_fill_target_range_js(autofill: &str, original: &str) -> Result<JsValue, JsError> {
    let target = compute_fill_target_range(&selection_from_js(autofill)?, &selection_from_js(original)?);
    match target {
        Some(target) => to_js_value(&target),
        None => Ok(JsValue::NULL),
    }
}

#[wasm_bindgen(start)]
pub fn init() {}
