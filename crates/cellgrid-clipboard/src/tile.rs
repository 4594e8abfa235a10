//! Fill-to-selection tiling
//!
//! Pasting a small block into a larger selection repeats the whole block: copies are
//! laid side by side, row-wise then column-wise, until they cover the selection, and the
//! result is cut to its size. Each copy's formulas move with it.

use crate::model::ClipboardCell;
use cellgrid_core::shift_formula_references;

/// Tile `cells` to cover a `height x width` area.
///
/// Only an axis on which the block is smaller than the area is tiled; a larger block
/// keeps its own extent on that axis. Short rows are padded with empty cells first, and
/// spans are clipped so no merge reaches past the result.
pub fn tile_cells(
    cells: &[Vec<Option<ClipboardCell>>],
    height: usize,
    width: usize,
) -> Vec<Vec<Option<ClipboardCell>>> {
    let block_height = cells.len();
    let block_width = cells.iter().map(Vec::len).max().unwrap_or(0);
    if block_height == 0 || block_width == 0 {
        return Vec::new();
    }

    let out_height = block_height.max(height);
    let out_width = block_width.max(width);

    (0..out_height)
        .map(|r| {
            let (copy_row, src_row) = (r / block_height, r % block_height);
            (0..out_width)
                .map(|c| {
                    let (copy_col, src_col) = (c / block_width, c % block_width);
                    let slot = match cells[src_row].get(src_col) {
                        Some(slot) => slot.clone(),
                        None => Some(ClipboardCell::default()),
                    };
                    slot.map(|cell| {
                        place_copy(
                            cell,
                            (copy_row * block_height) as i64,
                            (copy_col * block_width) as i64,
                            (out_height - r) as u32,
                            (out_width - c) as u32,
                        )
                    })
                })
                .collect()
        })
        .collect()
}

fn place_copy(
    mut cell: ClipboardCell,
    d_row: i64,
    d_col: i64,
    rows_left: u32,
    cols_left: u32,
) -> ClipboardCell {
    if d_row != 0 || d_col != 0 {
        cell.expression = shift_formula_references(&cell.expression, d_row, d_col);
    }
    cell.row_span = cell.row_span.map(|n| n.min(rows_left));
    cell.col_span = cell.col_span.map(|n| n.min(cols_left));
    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(rows: &[&[&str]]) -> Vec<Vec<Option<ClipboardCell>>> {
        rows.iter()
            .map(|row| row.iter().map(|t| Some(ClipboardCell::plain(*t))).collect())
            .collect()
    }

    fn expressions(cells: &[Vec<Option<ClipboardCell>>]) -> Vec<Vec<String>> {
        cells
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| slot.as_ref().map_or("-".to_string(), |c| c.expression.clone()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_whole_copies_then_trim() {
        let tiled = tile_cells(&block(&[&["a", "b"], &["c", "d"]]), 3, 5);
        assert_eq!(
            expressions(&tiled),
            vec![
                vec!["a", "b", "a", "b", "a"],
                vec!["c", "d", "c", "d", "c"],
                vec!["a", "b", "a", "b", "a"],
            ]
        );
    }

    #[test]
    fn test_larger_block_is_not_cut() {
        let tiled = tile_cells(&block(&[&["a", "b", "c"]]), 2, 1);
        assert_eq!(expressions(&tiled), vec![vec!["a", "b", "c"], vec!["a", "b", "c"]]);
    }

    #[test]
    fn test_formulas_follow_their_copy() {
        let tiled = tile_cells(&block(&[&["=A1"], &["=$A$1+B1"]]), 4, 2);
        assert_eq!(
            expressions(&tiled),
            vec![
                vec!["=A1", "=B1"],
                vec!["=$A$1+B1", "=$A$1+C1"],
                vec!["=A3", "=B3"],
                vec!["=$A$1+B3", "=$A$1+C3"],
            ]
        );
    }

    #[test]
    fn test_jagged_rows_are_padded() {
        let tiled = tile_cells(&block(&[&["a", "b"], &["c"]]), 2, 2);
        assert_eq!(expressions(&tiled), vec![vec!["a", "b"], vec!["c", ""]]);
    }

    #[test]
    fn test_spans_are_clipped() {
        let root = ClipboardCell {
            row_span: Some(2),
            col_span: Some(2),
            ..ClipboardCell::plain("m")
        };
        let cells = vec![vec![Some(root), None], vec![None, None]];
        let tiled = tile_cells(&cells, 3, 2);
        assert_eq!(tiled.len(), 3);
        assert_eq!(tiled[2][0].as_ref().unwrap().row_span, Some(1));
        assert_eq!(tiled[2][1], None);
    }
}
