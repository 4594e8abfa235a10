//! Keyboard navigation over visible rows and columns
//!
//! Adjacency is defined purely over the list of visible indices on the travel axis, so
//! hidden rows and columns are never visited or counted. Merged blocks read as a single
//! cell: every cell of a block is as empty or filled as its root.

use crate::cell::{CellAddress, Grid};
use crate::direction::{Axis, Direction, Step};
use crate::merge::{push_past_merged_edge, root_of};
use crate::selection::SheetSelection;

/// Whether the cell (or the root of the block covering it) has a non-blank expression
pub fn is_filled(grid: &Grid, addr: CellAddress) -> bool {
    let root = root_of(grid, addr.row, addr.col);
    grid.get(root.address).map_or(false, |cell| !cell.is_empty())
}

/// Ctrl+Arrow: jump to the boundary of the contiguous block along `axis`.
///
/// If the current cell and its next visible neighbour are both filled, the jump lands
/// on the last filled cell of that run. Otherwise it lands on the first filled cell
/// found further on. Running out of visible indices lands on the outermost visible
/// index. The other axis is never changed and the result is always a single cell.
pub fn skip_to_block_boundary(
    axis: Axis,
    step: Step,
    grid: &Grid,
    current: CellAddress,
    visible: &[u32],
) -> SheetSelection {
    let edge = match (step, visible.first(), visible.last()) {
        (Step::Forward, _, Some(last)) => *last,
        (Step::Backward, Some(first), _) => *first,
        _ => return SheetSelection::single(current),
    };
    let land = |index: u32| SheetSelection::single(axis.with(current, index));

    let delta = step.delta();
    let position = axis.of(current);
    let next_pos = match visible.iter().position(|&i| i == position) {
        Some(pos) => pos as i64 + delta,
        // Hidden current cell: continue from the nearest visible index on that side
        None => {
            let after = visible.partition_point(|&i| i < position) as i64;
            match step {
                Step::Forward => after,
                Step::Backward => after - 1,
            }
        }
    };

    if next_pos < 0 || next_pos >= visible.len() as i64 {
        return land(edge);
    }

    let filled_at = |pos: i64| is_filled(grid, axis.with(current, visible[pos as usize]));
    let searching_for_last_filled = is_filled(grid, current) && filled_at(next_pos);

    let mut pos = next_pos;
    while pos >= 0 && pos < visible.len() as i64 {
        let filled = filled_at(pos);
        if searching_for_last_filled && !filled {
            return land(visible[(pos - delta) as usize]);
        }
        if !searching_for_last_filled && filled {
            return land(visible[pos as usize]);
        }
        pos += delta;
    }

    land(edge)
}

/// Plain arrow-key move of the `end` corner to the next visible cell.
///
/// A corner inside a merged block first leaves the block entirely. At the last visible
/// index the selection stays put. A single-cell selection moves as a whole.
pub fn move_by_one(
    selection: &SheetSelection,
    grid: &Grid,
    direction: Direction,
    visible_rows: &[u32],
    visible_cols: &[u32],
) -> SheetSelection {
    let axis = direction.axis();
    let visible = match axis {
        Axis::Row => visible_rows,
        Axis::Col => visible_cols,
    };

    let pushed = push_past_merged_edge(selection, grid, direction);
    let target = if pushed != *selection {
        nearest_visible(visible, axis.of(pushed.end), direction.step(), true)
    } else {
        nearest_visible(visible, axis.of(selection.end), direction.step(), false)
    };

    let Some(index) = target else {
        return *selection;
    };

    let end = axis.with(selection.end, index);
    if selection.is_single_cell() {
        SheetSelection::single(end)
    } else {
        SheetSelection::new(selection.start, end)
    }
}

/// Nearest visible index from `from` in the direction of `step`
fn nearest_visible(visible: &[u32], from: u32, step: Step, inclusive: bool) -> Option<u32> {
    match step {
        Step::Forward => visible
            .iter()
            .copied()
            .find(|&i| if inclusive { i >= from } else { i > from }),
        Step::Backward => visible
            .iter()
            .rev()
            .copied()
            .find(|&i| if inclusive { i <= from } else { i < from }),
    }
}
