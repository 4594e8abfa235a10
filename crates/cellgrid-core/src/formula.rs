//! A1 reference shifting for copied formulas
//!
//! When a formula is replicated by autofill or tiled by paste, its relative references
//! move with it. `$`-anchored axes stay put, string literals are left alone, and a
//! reference pushed off the top or left of the sheet becomes `#REF!`.

use crate::cell::{column_to_index, format_address};
use lazy_regex::regex;
use regex::Captures;

/// Placeholder for a reference that cannot be expressed
pub const REF_ERROR: &str = "#REF!";

/// Shift every relative A1 reference in `formula` by the given deltas.
///
/// ```
/// use cellgrid_core::formula::shift_formula_references;
///
/// assert_eq!(shift_formula_references("=A1+$B$2*C$3", 2, 1), "=B3+$B$2*D$3");
/// assert_eq!(shift_formula_references("=A1", -1, 0), "=#REF!");
/// ```
pub fn shift_formula_references(formula: &str, d_row: i64, d_col: i64) -> String {
    if !formula.starts_with('=') || (d_row == 0 && d_col == 0) {
        return formula.to_string();
    }

    map_outside_strings(formula, |segment| {
        let pattern = regex!(r"(?i)(\$?)([A-Z]{1,3})(\$?)([0-9]+)\b");
        let mut out = String::with_capacity(segment.len());
        let mut last = 0;

        for caps in pattern.captures_iter(segment) {
            let Some(whole) = caps.get(0) else { continue };
            if !is_reference_boundary(segment, whole.start(), whole.end()) {
                continue;
            }
            out.push_str(&segment[last..whole.start()]);
            out.push_str(&shift_match(&caps, d_row, d_col));
            last = whole.end();
        }

        out.push_str(&segment[last..]);
        out
    })
}

/// A reference must not be glued to an identifier on the left or be a function call
pub(crate) fn is_reference_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let glued = before.map_or(false, |c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    !glued && after != Some('(')
}

fn shift_match(caps: &Captures, d_row: i64, d_col: i64) -> String {
    let col_absolute = &caps[1] == "$";
    let row_absolute = &caps[3] == "$";

    let col = match column_to_index(&caps[2]) {
        Some(prefix) => prefix.index as i64,
        None => return caps[0].to_string(),
    };
    let row = match caps[4].parse::<i64>() {
        Ok(row) if row > 0 => row - 1,
        _ => return caps[0].to_string(),
    };

    let new_col = if col_absolute { col } else { col + d_col };
    let new_row = if row_absolute { row } else { row + d_row };

    if new_col < 0 || new_row < 0 || new_col > u32::MAX as i64 || new_row >= u32::MAX as i64 {
        return REF_ERROR.to_string();
    }

    format_address(new_col as u32, new_row as u32, col_absolute, row_absolute)
}

/// Apply `f` to the parts of a formula that are not inside `"..."` string literals
pub(crate) fn map_outside_strings<F>(formula: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut out = String::with_capacity(formula.len());
    for (i, segment) in formula.split('"').enumerate() {
        if i > 0 {
            out.push('"');
        }
        if i % 2 == 0 {
            out.push_str(&f(segment));
        } else {
            out.push_str(segment);
        }
    }
    out
}
