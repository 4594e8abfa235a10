//! Grid editing through the clipboard and the fill handle
//!
//! The pure operations in `cellgrid-core` and `cellgrid-clipboard` hand back lists of
//! edits. [`GridEditExt`] applies them to a [`Grid`] the host owns, for hosts that keep
//! their sheet in one.
//!
//! # Example
//!
//! ```rust
//! use cellgrid::prelude::*;
//!
//! let mut grid = Grid::new(4, 4);
//! let parsed = parse_clipboard(None, Some("1\t2\n3\t4"), &PasteOptions::default());
//! grid.paste(&parsed, "B2".parse().unwrap()).unwrap();
//!
//! assert_eq!(grid.cell(2, 2).unwrap().expression, "4");
//! ```

use crate::{
    plan_fill, unmerge_range, AttributeUpdate, CellAddress, ClipboardResult, FillTarget, Grid,
    GridCell, ParsedClipboard, PasteUpdates, Result, SelectionRectangle, ValueUpdate,
};

/// Extension trait applying paste and autofill edits to a [`Grid`]
pub trait GridEditExt {
    /// Write a parsed paste with its top-left cell at `at`.
    ///
    /// Merges touching the target are dissolved first, including their cells outside
    /// the target; merges carried by the paste are then recreated. The whole block must
    /// fit the grid.
    ///
    /// The returned updates describe every change made to the grid: the dissolved
    /// merges, attributes dropped from overwritten cells, then the pasted cells (short
    /// rows are padded with empty cells).
    fn paste(&mut self, parsed: &ParsedClipboard, at: CellAddress) -> ClipboardResult<PasteUpdates>;

    /// Fill a target range from its source cells
    fn autofill(&mut self, target: &FillTarget) -> Result<Vec<ValueUpdate>>;
}

impl GridEditExt for Grid {
    fn paste(&mut self, parsed: &ParsedClipboard, at: CellAddress) -> ClipboardResult<PasteUpdates> {
        if parsed.is_empty() {
            return Ok(PasteUpdates::default());
        }

        let rect = SelectionRectangle::from_origin(at, parsed.height() as u32, parsed.width() as u32);
        self.check_rectangle(&rect)?;

        let mut updates = PasteUpdates {
            value_updates: Vec::new(),
            attribute_updates: unmerge_range(self, &rect.to_selection())?,
        };

        let block = parsed.to_grid();
        for (r, row) in block.rows().enumerate() {
            for (c, source) in row.iter().enumerate() {
                let addr = CellAddress::new(
                    at.col.saturating_add(c as u32),
                    at.row.saturating_add(r as u32),
                );
                let cell = self.try_cell_mut(addr.row, addr.col)?;

                updates.attribute_updates.extend(
                    cell.attributes
                        .keys()
                        .filter(|key| !source.attributes.contains_key(*key))
                        .map(|key| AttributeUpdate::remove(addr, key)),
                );
                if parsed.cells.get(r).map_or(true, |cells| c >= cells.len()) {
                    updates.value_updates.push(ValueUpdate::new(addr, Some(String::new())));
                }

                *cell = GridCell {
                    merged_into: source
                        .merged_into
                        .and_then(|root| root.offset(at.col as i64, at.row as i64)),
                    ..source.clone()
                };
            }
        }

        let pasted = parsed.updates(at);
        updates.value_updates.extend(pasted.value_updates);
        updates.attribute_updates.extend(pasted.attribute_updates);

        log::debug!(
            "pasted {:?} block into {} ({} value, {} attribute updates)",
            parsed.source,
            rect,
            updates.value_updates.len(),
            updates.attribute_updates.len()
        );
        Ok(updates)
    }

    fn autofill(&mut self, target: &FillTarget) -> Result<Vec<ValueUpdate>> {
        let updates = plan_fill(self, target);
        for update in &updates {
            let cell = self.try_cell_mut(update.address.row, update.address.col)?;
            let expression = update.value.clone().unwrap_or_default();
            cell.value = (!expression.starts_with('=')).then(|| expression.clone());
            cell.expression = expression;
        }
        Ok(updates)
    }
}
