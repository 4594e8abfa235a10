//! Merged cell resolution
//!
//! A merged block has exactly one root cell carrying `row_span`/`col_span` and the
//! display value. Every other cell of the block points back at the root through
//! `merged_into` and holds a null value.

use crate::cell::{attributes, CellAddress, Grid};
use crate::direction::{Axis, Direction};
use crate::error::{Error, Result};
use crate::selection::{SelectionRectangle, SheetSelection};
use crate::update::{AttributeUpdate, ValueUpdate};

/// The root a cell resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRoot {
    pub address: CellAddress,
    /// Root spans more than one row
    pub is_row_merged: bool,
    /// Root spans more than one column
    pub is_col_merged: bool,
}

impl MergeRoot {
    fn identity(row: u32, col: u32) -> Self {
        Self {
            address: CellAddress::new(col, row),
            is_row_merged: false,
            is_col_merged: false,
        }
    }

    /// Whether the cell belongs to a block spanning more than one cell
    pub fn is_merged(&self) -> bool {
        self.is_row_merged || self.is_col_merged
    }

    /// Whether the block spans more than one cell along `axis`
    pub fn is_merged_along(&self, axis: Axis) -> bool {
        match axis {
            Axis::Row => self.is_row_merged,
            Axis::Col => self.is_col_merged,
        }
    }
}

/// Edits produced by [`merge_range`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    pub value_updates: Vec<ValueUpdate>,
    pub attribute_updates: Vec<AttributeUpdate>,
}

/// Resolve the merge root of a cell.
///
/// A cell with spans is its own root; a cell with `merged_into` reads the spans of the
/// cell it points at; anything else resolves to itself, unmerged.
pub fn root_of(grid: &Grid, row: u32, col: u32) -> MergeRoot {
    let cell = match grid.cell(row, col) {
        Some(cell) => cell,
        None => return MergeRoot::identity(row, col),
    };

    let address = if cell.is_merge_root() {
        CellAddress::new(col, row)
    } else if let Some(target) = cell.merged_into {
        target
    } else {
        return MergeRoot::identity(row, col);
    };

    match grid.get(address) {
        Some(root) => MergeRoot {
            address,
            is_row_merged: root.row_span.unwrap_or(1) > 1,
            is_col_merged: root.col_span.unwrap_or(1) > 1,
        },
        None => MergeRoot::identity(row, col),
    }
}

/// Rectangle of the merged block containing the cell, if it is merged
pub fn merge_block(grid: &Grid, row: u32, col: u32) -> Option<SelectionRectangle> {
    let root = root_of(grid, row, col);
    if !root.is_merged() {
        return None;
    }
    let cell = grid.get(root.address)?;
    Some(SelectionRectangle::from_origin(
        root.address,
        cell.row_span.unwrap_or(1),
        cell.col_span.unwrap_or(1),
    ))
}

/// Every merged block of the grid, in row-major order of their roots
pub fn merge_blocks(grid: &Grid) -> Vec<SelectionRectangle> {
    let mut blocks = Vec::new();
    for (row, cells) in grid.rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if cell.is_merge_root() {
                let origin = CellAddress::new(col as u32, row as u32);
                blocks.push(SelectionRectangle::from_origin(
                    origin,
                    cell.row_span.unwrap_or(1),
                    cell.col_span.unwrap_or(1),
                ));
            }
        }
    }
    blocks
}

/// Check the merge invariants: no cell is both root and covered, every covered cell
/// points at a root whose span contains it, and every cell inside a root's span is
/// either plain or points back to that root.
pub fn validate_merges(grid: &Grid) -> Result<()> {
    for block in merge_blocks(grid) {
        let root = block.top_left();
        if grid.get(root).and_then(|c| c.merged_into).is_some() {
            return Err(Error::MergeConflict {
                range: block.to_a1_string(),
                root: root.to_string(),
            });
        }
        let clipped = grid
            .bounds()
            .and_then(|bounds| bounds.intersect(&block))
            .filter(|clipped| *clipped == block)
            .ok_or_else(|| Error::MergeConflict {
                range: block.to_a1_string(),
                root: root.to_string(),
            })?;
        for addr in clipped.cells().filter(|a| *a != root) {
            let cell = grid.get(addr).filter(|c| !c.is_merge_root());
            match cell.map(|c| c.merged_into) {
                Some(None) => {}
                Some(Some(target)) if target == root => {}
                _ => {
                    return Err(Error::MergeConflict {
                        range: block.to_a1_string(),
                        root: root.to_string(),
                    })
                }
            }
        }
    }

    for (row, cells) in grid.rows().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(target) = cell.merged_into {
                let inside = merge_block(grid, row as u32, col as u32)
                    .map_or(false, |block| block.contains(row as u32, col as u32));
                if !inside {
                    return Err(Error::MergeConflict {
                        range: CellAddress::new(col as u32, row as u32).to_string(),
                        root: target.to_string(),
                    });
                }
            }
        }
    }

    Ok(())
}

/// Merge the cells of `selection` into one block rooted at its top-left cell.
///
/// The first non-empty value in row-major order survives and moves to the root; every
/// other value in the range is discarded. Existing blocks fully inside the range are
/// absorbed; a block that only partially overlaps the range is a conflict.
pub fn merge_range(grid: &mut Grid, selection: &SheetSelection) -> Result<MergeOutcome> {
    let rect = selection.to_rectangle();
    grid.check_rectangle(&rect)?;
    // Nothing is written unless every cell of the block exists
    for addr in rect.cells() {
        grid.try_cell(addr.row, addr.col)?;
    }

    if rect.cell_count() < 2 {
        return Err(Error::InvalidRange(format!(
            "{} is a single cell",
            rect.to_a1_string()
        )));
    }

    for addr in rect.cells() {
        if let Some(block) = merge_block(grid, addr.row, addr.col) {
            if !rect.contains_rectangle(&block) {
                return Err(Error::MergeConflict {
                    range: rect.to_a1_string(),
                    root: block.top_left().to_string(),
                });
            }
        }
    }

    let (value, expression) = rect
        .cells()
        .filter_map(|addr| grid.get(addr))
        .find(|cell| !cell.display_value().is_empty())
        .map(|cell| (cell.display_value().to_string(), cell.expression.clone()))
        .unwrap_or_default();

    let root = rect.top_left();
    let mut outcome = MergeOutcome::default();

    for addr in rect.cells() {
        let cell = grid.try_cell_mut(addr.row, addr.col)?;
        cell.clear_merge();

        if addr == root {
            cell.value = Some(value.clone());
            cell.expression = expression.clone();
            cell.row_span = Some(rect.height());
            cell.col_span = Some(rect.width());

            outcome
                .value_updates
                .push(ValueUpdate::new(addr, Some(expression.clone())));
            outcome.attribute_updates.extend([
                AttributeUpdate::set(addr, attributes::ROW_SPAN, rect.height().to_string()),
                AttributeUpdate::set(addr, attributes::COL_SPAN, rect.width().to_string()),
                AttributeUpdate::remove(addr, attributes::MERGED_INTO),
            ]);
        } else {
            cell.value = None;
            cell.expression.clear();
            cell.merged_into = Some(root);

            outcome.value_updates.push(ValueUpdate::new(addr, None));
            outcome.attribute_updates.extend([
                AttributeUpdate::remove(addr, attributes::ROW_SPAN),
                AttributeUpdate::remove(addr, attributes::COL_SPAN),
                AttributeUpdate::set(addr, attributes::MERGED_INTO, root.to_string()),
            ]);
        }
    }

    log::debug!("merged {} into root {}", rect, root);
    Ok(outcome)
}

/// Remove every merge touching `selection`.
///
/// Blocks that only partially overlap the selection are dissolved whole so no covered
/// cell is left pointing at a root without spans. Values discarded by the merge are not
/// restored.
pub fn unmerge_range(grid: &mut Grid, selection: &SheetSelection) -> Result<Vec<AttributeUpdate>> {
    let rect = selection.to_rectangle();
    grid.check_rectangle(&rect)?;

    let mut target = rect;
    for addr in rect.cells() {
        if let Some(block) = merge_block(grid, addr.row, addr.col) {
            target = target.union(&block);
        }
    }

    let mut updates = Vec::new();
    for addr in target.cells() {
        let Some(cell) = grid.cell_mut(addr.row, addr.col) else {
            continue;
        };
        if cell.is_merge_root() {
            updates.push(AttributeUpdate::remove(addr, attributes::ROW_SPAN));
            updates.push(AttributeUpdate::remove(addr, attributes::COL_SPAN));
        }
        if cell.merged_into.is_some() {
            updates.push(AttributeUpdate::remove(addr, attributes::MERGED_INTO));
        }
        cell.clear_merge();
    }

    Ok(updates)
}

/// Grow a selection until no merged block straddles its edge.
///
/// Each pass collects the blocks of every cell inside the current rectangle that reach
/// outside it, then pushes each edge outward to cover them while keeping the corner
/// orientation of the input. The passes repeat until nothing changes.
///
/// A selection that never touches a merge comes back unchanged. One that already lines
/// up with exactly one merged block comes back normalized.
pub fn expand_selection_for_merges(selection: &SheetSelection, grid: &Grid) -> SheetSelection {
    let (expanded, touched) = grow_to_merges(*selection, grid, false);

    if !touched {
        return *selection;
    }

    let rect = expanded.to_rectangle();
    if expanded == *selection && merge_block(grid, rect.top, rect.left) == Some(rect) {
        return expanded.normalize();
    }

    expanded
}

fn grow_to_merges(selection: SheetSelection, grid: &Grid, touched: bool) -> (SheetSelection, bool) {
    let rect = selection.to_rectangle();
    let mut touched = touched;
    let mut grown = rect;

    if let Some(visible) = grid
        .bounds()
        .and_then(|bounds| bounds.intersect(&rect))
    {
        for addr in visible.cells() {
            if let Some(block) = merge_block(grid, addr.row, addr.col) {
                touched = true;
                if !rect.contains_rectangle(&block) {
                    grown = grown.union(&block);
                }
            }
        }
    }

    if grown == rect {
        return (selection, touched);
    }

    grow_to_merges(reorient(&selection, &grown), grid, touched)
}

/// Selection covering `rect` with each corner on the same side as in `selection`
fn reorient(selection: &SheetSelection, rect: &SelectionRectangle) -> SheetSelection {
    let (start_row, end_row) = if selection.start.row <= selection.end.row {
        (rect.top, rect.bottom)
    } else {
        (rect.bottom, rect.top)
    };
    let (start_col, end_col) = if selection.start.col <= selection.end.col {
        (rect.left, rect.right)
    } else {
        (rect.right, rect.left)
    };
    SheetSelection::new(
        CellAddress::new(start_col, start_row),
        CellAddress::new(end_col, end_row),
    )
}

/// Move the moving corner of a selection out of a merged block along `direction`.
///
/// When the `end` corner sits in a block that spans the travel axis, the corner jumps
/// to the first cell past the block. At the grid boundary the selection is left as it
/// is. A single-cell selection stays single.
pub fn push_past_merged_edge(
    selection: &SheetSelection,
    grid: &Grid,
    direction: Direction,
) -> SheetSelection {
    let origin = selection.end;
    let root = root_of(grid, origin.row, origin.col);
    if !root.is_merged_along(direction.axis()) {
        return *selection;
    }

    let mut pos = origin;
    let landing = loop {
        let next = match direction.advance(pos) {
            Some(next) if grid.in_bounds(next.row, next.col) => next,
            _ => return *selection,
        };
        if root_of(grid, next.row, next.col).address != root.address {
            break next;
        }
        pos = next;
    };

    if selection.is_single_cell() {
        SheetSelection::single(landing)
    } else {
        SheetSelection::new(selection.start, landing)
    }
}

/// Leading rows and columns pinned by a freeze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrozenPanes {
    /// Number of frozen rows at the top
    pub rows: u32,
    /// Number of frozen columns at the left
    pub cols: u32,
}

impl FrozenPanes {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Whether the rectangle has cells on both sides of a freeze line
    pub fn splits(&self, rect: &SelectionRectangle) -> bool {
        let splits_rows = self.rows > 0 && rect.top < self.rows && rect.bottom >= self.rows;
        let splits_cols = self.cols > 0 && rect.left < self.cols && rect.right >= self.cols;
        splits_rows || splits_cols
    }
}

/// Whether merging `selection` would straddle a freeze line
pub fn merge_straddles_freeze(selection: &SheetSelection, panes: &FrozenPanes) -> bool {
    panes.splits(&selection.to_rectangle())
}

/// First existing merged block that freezing at `panes` would split
pub fn freeze_would_split_merge(grid: &Grid, panes: &FrozenPanes) -> Option<SelectionRectangle> {
    merge_blocks(grid)
        .into_iter()
        .find(|block| panes.splits(block))
}

/// [`merge_range`] refusing ranges that straddle a freeze line
pub fn merge_range_with_panes(
    grid: &mut Grid,
    selection: &SheetSelection,
    panes: &FrozenPanes,
) -> Result<MergeOutcome> {
    if merge_straddles_freeze(selection, panes) {
        return Err(Error::FrozenPaneConflict(selection.to_a1_string()));
    }
    merge_range(grid, selection)
}
