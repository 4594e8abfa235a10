//! Autofill drag handling
//!
//! Dragging the fill handle extends the original block along exactly one axis: the one
//! the cursor has moved furthest along. Once the drag ends, the fill target is the strip
//! between the original block and the new edge, and its values are generated from the
//! source line it extends.

use crate::cell::{CellAddress, Grid};
use crate::formula::shift_formula_references;
use crate::selection::{SelectionRectangle, SheetSelection};
use crate::update::ValueUpdate;

/// Edge the autofill grows from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FillDirection {
    Top,
    Bottom,
    Left,
    Right,
}

impl FillDirection {
    /// Whether the fill grows along rows
    pub fn is_vertical(self) -> bool {
        matches!(self, FillDirection::Top | FillDirection::Bottom)
    }
}

/// Signed distance of `value` outside `[low, high]`, 0 inside
fn outside_by(value: u32, low: u32, high: u32) -> i64 {
    if value < low {
        value as i64 - low as i64
    } else if value > high {
        value as i64 - high as i64
    } else {
        0
    }
}

/// Direction the cursor at `(row, col)` has been dragged out of `rect`.
///
/// The axis with the larger distance wins; equal distances resolve to the vertical
/// axis. `None` while the cursor is still inside the rectangle.
pub fn dominant_direction(rect: &SelectionRectangle, row: u32, col: u32) -> Option<FillDirection> {
    let v_delta = outside_by(row, rect.top, rect.bottom);
    let h_delta = outside_by(col, rect.left, rect.right);

    if v_delta == 0 && h_delta == 0 {
        return None;
    }

    if h_delta.abs() > v_delta.abs() {
        Some(if h_delta < 0 {
            FillDirection::Left
        } else {
            FillDirection::Right
        })
    } else {
        Some(if v_delta < 0 {
            FillDirection::Top
        } else {
            FillDirection::Bottom
        })
    }
}

/// Autofill selection for a drag of `original` to the cursor at `(row, col)`.
///
/// Only the edge facing the dominant direction moves; the opposite corner and the
/// other axis are kept. A cursor back inside the original block returns it unchanged.
pub fn extend_along_one_axis(original: &SheetSelection, row: u32, col: u32) -> SheetSelection {
    let rect = original.to_rectangle();
    let Some(direction) = dominant_direction(&rect, row, col) else {
        return *original;
    };

    let mut extended = rect.to_selection();
    match direction {
        FillDirection::Top => extended.start.row = row,
        FillDirection::Bottom => extended.end.row = row,
        FillDirection::Left => extended.start.col = col,
        FillDirection::Right => extended.end.col = col,
    }
    extended
}

/// The block an autofill must populate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FillTarget {
    /// The original block, normalized
    pub populate_from: SheetSelection,
    /// Top-left of the block to fill
    pub populate_to_start: CellAddress,
    /// Bottom-right of the block to fill
    pub populate_to_end: CellAddress,
    pub direction: FillDirection,
}

impl FillTarget {
    /// Rectangle to fill
    pub fn target_rectangle(&self) -> SelectionRectangle {
        SheetSelection::new(self.populate_to_start, self.populate_to_end).to_rectangle()
    }
}

/// Work out which edge an autofill moved and the block it adds.
///
/// Growth is checked downward, rightward, upward, then leftward; the first match wins.
/// The returned block abuts the original with no gap or overlap. `None` when the
/// autofill selection did not grow past the original.
pub fn compute_fill_target_range(
    autofill: &SheetSelection,
    original: &SheetSelection,
) -> Option<FillTarget> {
    let from = original.to_rectangle();
    let to = autofill.to_rectangle();

    let (direction, target) = if to.bottom > from.bottom {
        (
            FillDirection::Bottom,
            SelectionRectangle::new(from.bottom + 1, to.bottom, from.left, from.right),
        )
    } else if to.right > from.right {
        (
            FillDirection::Right,
            SelectionRectangle::new(from.top, from.bottom, from.right + 1, to.right),
        )
    } else if to.top < from.top {
        (
            FillDirection::Top,
            SelectionRectangle::new(to.top, from.top - 1, from.left, from.right),
        )
    } else if to.left < from.left {
        (
            FillDirection::Left,
            SelectionRectangle::new(from.top, from.bottom, to.left, from.left - 1),
        )
    } else {
        return None;
    };

    Some(FillTarget {
        populate_from: from.to_selection(),
        populate_to_start: target.top_left(),
        populate_to_end: target.bottom_right(),
        direction,
    })
}

/// Generate `count` values continuing `source`.
///
/// Two or more numbers with a constant step continue the progression. Anything else
/// repeats the source cyclically; a single number is copied, not incremented.
pub fn fill_series(source: &[&str], count: usize) -> Vec<String> {
    if source.is_empty() {
        return Vec::new();
    }

    if let Some(step) = linear_step(source) {
        let last = source[source.len() - 1].trim().parse::<f64>().unwrap_or(0.0);
        return (1..=count)
            .map(|i| format_number(last + step * i as f64))
            .collect();
    }

    source
        .iter()
        .cycle()
        .take(count)
        .map(|s| s.to_string())
        .collect()
}

fn linear_step(source: &[&str]) -> Option<f64> {
    if source.len() < 2 {
        return None;
    }
    let numbers: Vec<f64> = source
        .iter()
        .map(|s| s.trim().parse::<f64>().ok())
        .collect::<Option<_>>()?;
    let step = numbers[1] - numbers[0];
    let constant = numbers
        .windows(2)
        .all(|pair| ((pair[1] - pair[0]) - step).abs() < 1e-9);
    constant.then_some(step)
}

/// Render a number the way it would be typed: integers without a fraction, others
/// with at most ten decimals and no trailing zeros
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        let text = format!("{:.10}", n);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Value updates that populate `target` from the source lines of the original block.
///
/// Each row (horizontal fill) or column (vertical fill) of the original block is a
/// source line. Formula cells are replicated with their references shifted by their
/// distance from the cell they were copied from.
pub fn plan_fill(grid: &Grid, target: &FillTarget) -> Vec<ValueUpdate> {
    let from = target.populate_from.to_rectangle();
    let dest = target.target_rectangle();
    let backwards = matches!(target.direction, FillDirection::Top | FillDirection::Left);

    let expression = |row: u32, col: u32| {
        grid.cell(row, col)
            .map(|c| c.expression.as_str())
            .unwrap_or("")
    };

    // (source addresses in fill order, destination addresses in fill order)
    let lines: Vec<(Vec<CellAddress>, Vec<CellAddress>)> = if target.direction.is_vertical() {
        (from.left..=from.right)
            .map(|col| {
                let mut src: Vec<_> = (from.top..=from.bottom)
                    .map(|row| CellAddress::new(col, row))
                    .collect();
                let mut dst: Vec<_> = (dest.top..=dest.bottom)
                    .map(|row| CellAddress::new(col, row))
                    .collect();
                if backwards {
                    src.reverse();
                    dst.reverse();
                }
                (src, dst)
            })
            .collect()
    } else {
        (from.top..=from.bottom)
            .map(|row| {
                let mut src: Vec<_> = (from.left..=from.right)
                    .map(|col| CellAddress::new(col, row))
                    .collect();
                let mut dst: Vec<_> = (dest.left..=dest.right)
                    .map(|col| CellAddress::new(col, row))
                    .collect();
                if backwards {
                    src.reverse();
                    dst.reverse();
                }
                (src, dst)
            })
            .collect()
    };

    let mut updates = Vec::new();
    for (src, dst) in lines {
        let texts: Vec<&str> = src.iter().map(|a| expression(a.row, a.col)).collect();
        if texts.iter().any(|t| t.starts_with('=')) {
            for (i, addr) in dst.iter().enumerate() {
                let origin = src[i % src.len()];
                let d_row = addr.row as i64 - origin.row as i64;
                let d_col = addr.col as i64 - origin.col as i64;
                let text = shift_formula_references(texts[i % texts.len()], d_row, d_col);
                updates.push(ValueUpdate::new(*addr, Some(text)));
            }
        } else {
            for (addr, text) in dst.iter().zip(fill_series(&texts, dst.len())) {
                updates.push(ValueUpdate::new(*addr, Some(text)));
            }
        }
    }

    updates.sort_by_key(|u| (u.address.row, u.address.col));
    updates
}
