//! Span normalization
//!
//! HTML tables describe merged areas with `rowspan`/`colspan`, so rows can hold
//! different numbers of `<td>`s while still describing a rectangle. Normalization lays
//! the physical cells out on a dense grid, marking every position a spanning cell
//! covers so no later source cell is placed there.

use crate::html::{row_cells, HtmlNode};
use cellgrid_core::{MAX_COLS, MAX_ROWS};

/// Largest `colspan` honoured, as in browsers
pub const MAX_COLSPAN: usize = 1000;

/// Largest `rowspan` honoured, as in browsers
pub const MAX_ROWSPAN: usize = 65534;

/// Clamped `colspan` of a table cell
pub fn col_span<N: HtmlNode>(cell: &N) -> usize {
    cell.span_attribute("colspan").min(MAX_COLSPAN).min(MAX_COLS as usize)
}

/// Clamped `rowspan` of a table cell
pub fn row_span<N: HtmlNode>(cell: &N) -> usize {
    cell.span_attribute("rowspan").min(MAX_ROWSPAN).min(MAX_ROWS as usize)
}

/// One logical position of a normalized table
#[derive(Debug)]
pub enum Slot<'a, N> {
    /// A physical cell starts here
    Cell(&'a N),
    /// Covered by the spanning cell at `(row, col)`
    Covered { row: usize, col: usize },
    /// No source cell reached this position
    Unknown,
}

impl<'a, N> Clone for Slot<'a, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, N> Copy for Slot<'a, N> {}

impl<'a, N> Slot<'a, N> {
    /// The physical cell, if one starts here
    pub fn cell(&self) -> Option<&'a N> {
        match self {
            Slot::Cell(node) => Some(*node),
            _ => None,
        }
    }

    pub fn is_covered(&self) -> bool {
        matches!(self, Slot::Covered { .. })
    }
}

/// Logical column count of a table.
///
/// The `<colgroup>`/`<col>` declaration wins when present (sum of `span`); otherwise it
/// is the widest row after spans are counted. Either way the count never exceeds
/// [`MAX_COLS`].
pub fn table_column_count<N: HtmlNode>(table: &N, rows: &[&N]) -> usize {
    let declared: usize = table
        .children()
        .into_iter()
        .flat_map(|child| {
            if child.is("colgroup") {
                let cols: Vec<&N> = child.children().into_iter().filter(|c| c.is("col")).collect();
                if cols.is_empty() {
                    vec![col_group_span(child)]
                } else {
                    cols.into_iter().map(col_group_span).collect()
                }
            } else if child.is("col") {
                vec![col_group_span(child)]
            } else {
                Vec::new()
            }
        })
        .fold(0usize, |total, span| total.saturating_add(span))
        .min(MAX_COLS as usize);

    if declared > 0 {
        return declared;
    }

    // Without a declaration, count spans while accounting for cells pushed right by
    // rowspans from earlier rows
    normalize_rows(rows, None)
        .iter()
        .map(|row| {
            row.iter()
                .rposition(|slot| !matches!(slot, Slot::Unknown))
                .map_or(0, |last| last + 1)
        })
        .max()
        .unwrap_or(0)
}

/// `span` of a `<col>` or `<colgroup>`, clamped like `colspan`
fn col_group_span<N: HtmlNode>(col: &N) -> usize {
    col.span_attribute("span").min(MAX_COLSPAN)
}

/// Lay the rows of a table out on a dense `rows.len() x col_count` grid.
///
/// Cells are placed row-major at the next position not already covered by a rowspan
/// from above. A cell's `colspan` and `rowspan` cover positions to its right and below;
/// spans reaching past the grid are clipped. Cells that find no position left in their
/// row are dropped. `col_count` is capped at [`MAX_COLS`].
pub fn normalize_spans<'a, N: HtmlNode>(rows: &[&'a N], col_count: usize) -> Vec<Vec<Slot<'a, N>>> {
    normalize_rows(rows, Some(col_count))
}

/// Rows grow as cells are placed when `width` is `None`, up to [`MAX_COLS`]
fn normalize_rows<'a, N: HtmlNode>(rows: &[&'a N], width: Option<usize>) -> Vec<Vec<Slot<'a, N>>> {
    let height = rows.len();
    let limit = width.unwrap_or(MAX_COLS as usize).min(MAX_COLS as usize);
    let initial = if width.is_some() { limit } else { 0 };
    let mut grid: Vec<Vec<Slot<'a, N>>> = (0..height).map(|_| vec![Slot::Unknown; initial]).collect();

    for (r, row) in rows.iter().enumerate() {
        let mut col = 0;

        for cell in row_cells(*row) {
            while grid[r].get(col).map_or(false, |slot| !matches!(slot, Slot::Unknown)) {
                col += 1;
            }
            if col >= limit {
                log::debug!("dropping table cell past column {}", col);
                break;
            }

            let right = col.saturating_add(col_span(cell)).min(limit);
            let bottom = r.saturating_add(row_span(cell)).min(height);

            for rr in r..bottom {
                if grid[rr].len() < right {
                    grid[rr].resize(right, Slot::Unknown);
                }
                for cc in col..right {
                    grid[rr][cc] = if rr == r && cc == col {
                        Slot::Cell(cell)
                    } else {
                        Slot::Covered { row: r, col }
                    };
                }
            }

            col = right;
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::{find_first, parse_fragment, table_rows, Element};
    use pretty_assertions::assert_eq;

    /// Render a normalized grid as text: cell text, `^` for covered, `?` for unknown
    fn layout(html: &str) -> Vec<Vec<String>> {
        let doc = parse_fragment(html);
        let table = find_first(&doc, "table").unwrap();
        let rows = table_rows(table);
        let width = table_column_count(table, &rows);
        normalize_spans(&rows, width)
            .iter()
            .map(|row| row.iter().map(describe).collect())
            .collect()
    }

    fn describe(slot: &Slot<'_, Element>) -> String {
        match slot {
            Slot::Cell(node) => node.inner_text(),
            Slot::Covered { .. } => "^".to_string(),
            Slot::Unknown => "?".to_string(),
        }
    }

    #[test]
    fn test_two_by_two_root_covers_three_slots() {
        let doc = parse_fragment(
            "<table><colgroup><col span=2></colgroup><tbody>\
             <tr><td colspan=2 rowspan=2>a</td></tr><tr></tr></tbody></table>",
        );
        let table = find_first(&doc, "table").unwrap();
        let rows = table_rows(table);
        assert_eq!(table_column_count(table, &rows), 2);

        let grid = normalize_spans(&rows, 2);
        assert_eq!(grid.len(), 2);
        assert!(grid[0][0].cell().is_some());
        assert!(grid[0][1].is_covered());
        assert!(grid[1][0].is_covered());
        assert!(grid[1][1].is_covered());
    }

    #[test]
    fn test_rowspan_pushes_later_cells_right() {
        assert_eq!(
            layout(
                "<table><tr><td rowspan=2>a</td><td>b</td><td>c</td></tr>\
                 <tr><td>d</td><td>e</td></tr></table>"
            ),
            vec![vec!["a", "b", "c"], vec!["^", "d", "e"]]
        );
    }

    #[test]
    fn test_uneven_td_counts_stay_rectangular() {
        assert_eq!(
            layout(
                "<table><col><col><col>\
                 <tr><td colspan=2>a</td><td>b</td></tr>\
                 <tr><td>c</td><td colspan=2 rowspan=2>d</td></tr>\
                 <tr><td>e</td></tr></table>"
            ),
            vec![
                vec!["a", "^", "b"],
                vec!["c", "d", "^"],
                vec!["e", "^", "^"]
            ]
        );
    }

    #[test]
    fn test_short_rows_leave_unknown_slots() {
        assert_eq!(
            layout("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td></tr></table>"),
            vec![vec!["a", "b"], vec!["c", "?"]]
        );
    }

    #[test]
    fn test_spans_are_clipped_to_the_table() {
        assert_eq!(
            layout("<table><col span=2><tr><td colspan=5 rowspan=9>a</td></tr></table>"),
            vec![vec!["a", "^"]]
        );
    }

    #[test]
    fn test_huge_declared_width_is_capped() {
        let doc = parse_fragment("<table><col span=4000000000><col span=99><tr><td>a</td></tr></table>");
        let table = find_first(&doc, "table").unwrap();
        assert_eq!(table_column_count(table, &table_rows(table)), MAX_COLSPAN + 99);

        let doc = parse_fragment(&format!(
            "<table>{}<tr><td>a</td></tr></table>",
            "<col span=1000>".repeat(20)
        ));
        let table = find_first(&doc, "table").unwrap();
        assert_eq!(table_column_count(table, &table_rows(table)), MAX_COLS as usize);

        let grid = normalize_spans(&table_rows(table), usize::MAX);
        assert_eq!(grid[0].len(), MAX_COLS as usize);
    }

    #[test]
    fn test_huge_spans_are_clamped() {
        let doc = parse_fragment("<table><tr><td colspan=5000 rowspan=70000>a</td></tr></table>");
        let table = find_first(&doc, "table").unwrap();
        let td = find_first(table, "td").unwrap();
        assert_eq!(col_span(td), MAX_COLSPAN);
        assert_eq!(row_span(td), MAX_ROWSPAN);

        let rows = table_rows(table);
        let width = table_column_count(table, &rows);
        assert_eq!(width, MAX_COLSPAN);
        let grid = normalize_spans(&rows, width);
        assert_eq!(grid.len(), 1);
        assert!(grid[0][0].cell().is_some());
        assert!(grid[0][MAX_COLSPAN - 1].is_covered());

        // Too large for any integer type
        let doc = parse_fragment("<table><tr><td colspan=99999999999999999999999>a</td></tr></table>");
        let td = find_first(&doc, "td").unwrap();
        assert_eq!(col_span(td), 1);
    }

    #[test]
    fn test_garbage_spans_default_to_one() {
        assert_eq!(
            layout(
                "<table><tr><td colspan=0>a</td><td colspan=-2>b</td><td rowspan=x>c</td></tr>\
                 <tr><td>d</td><td>e</td><td>f</td></tr></table>"
            ),
            vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]
        );
    }

    #[test]
    fn test_undeclared_width_is_capped() {
        let cells = "<td colspan=1000>x</td>".repeat(20);
        let doc = parse_fragment(&format!("<table><tr>{}</tr></table>", cells));
        let table = find_first(&doc, "table").unwrap();
        let rows = table_rows(table);
        assert_eq!(table_column_count(table, &rows), MAX_COLS as usize);
    }
}
