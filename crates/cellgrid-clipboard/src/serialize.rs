//! Selection to clipboard serialization

use crate::css::attributes_to_style;
use crate::dialect;
use crate::error::ClipboardResult;
use crate::model::ClipboardPayload;
use crate::options::CopyOptions;
use cellgrid_core::attributes::{self, Attributes};
use cellgrid_core::{expand_selection_for_merges, Grid, GridCell, SelectionRectangle, SheetSelection};
use quick_xml::escape::escape;

/// Serialize a selection to its plain-text and HTML clipboard flavors.
///
/// The selection first grows to cover every merged block it touches. A single cell is
/// written as a `<span>`, anything larger as a `<table>` where merge roots carry
/// `rowspan`/`colspan` and covered cells are left out.
pub fn serialize_selection(
    grid: &Grid,
    selection: &SheetSelection,
    options: &CopyOptions,
) -> ClipboardResult<ClipboardPayload> {
    let rect = expand_selection_for_merges(selection, grid).to_rectangle();
    grid.check_rectangle(&rect)?;

    let text = plain_text(grid, &rect, options);
    let html = if rect.cell_count() == 1 {
        single_cell_html(grid, &rect, options)?
    } else {
        table_html(grid, &rect, options)?
    };

    log::debug!("serialized {} ({} bytes of html)", rect, html.len());
    Ok(ClipboardPayload { text, html })
}

/// Rendered values joined by the configured separators
pub fn plain_text(grid: &Grid, rect: &SelectionRectangle, options: &CopyOptions) -> String {
    (rect.top..=rect.bottom)
        .map(|row| {
            (rect.left..=rect.right)
                .map(|col| grid.cell(row, col).map_or("", GridCell::display_value))
                .collect::<Vec<_>>()
                .join(&options.column_separator)
        })
        .collect::<Vec<_>>()
        .join(&options.row_separator)
}

fn root_attributes(rect: &SelectionRectangle, options: &CopyOptions) -> String {
    let mut out = format!(" {}=\"{}\"", dialect::ORIGIN, rect.top_left());
    if let Some(cut_id) = &options.cut_id {
        out.push_str(&format!(" {}=\"{}\"", dialect::CUT_ID, escape(cut_id.as_str())));
    }
    out
}

fn single_cell_html(
    grid: &Grid,
    rect: &SelectionRectangle,
    options: &CopyOptions,
) -> ClipboardResult<String> {
    let cell = grid.get(rect.top_left()).cloned().unwrap_or_default();
    Ok(format!(
        "<span{}{}>{}</span>",
        root_attributes(rect, options),
        cell_attributes(&cell, options)?,
        cell_text(&cell)
    ))
}

fn table_html(
    grid: &Grid,
    rect: &SelectionRectangle,
    options: &CopyOptions,
) -> ClipboardResult<String> {
    let mut html = format!(
        "<table {}=\"{}\"{}><tbody>",
        dialect::MARKER,
        dialect::MARKER_TABLE,
        root_attributes(rect, options)
    );

    for row in rect.top..=rect.bottom {
        html.push_str("<tr>");
        for col in rect.left..=rect.right {
            let Some(cell) = grid.cell(row, col) else {
                continue;
            };
            if cell.merged_into.is_some() {
                continue;
            }

            html.push_str("<td");
            if let Some(span) = cell.row_span.filter(|&n| n > 1) {
                html.push_str(&format!(" rowspan=\"{}\"", span));
            }
            if let Some(span) = cell.col_span.filter(|&n| n > 1) {
                html.push_str(&format!(" colspan=\"{}\"", span));
            }
            html.push_str(&cell_attributes(cell, options)?);
            html.push('>');
            html.push_str(&cell_text(cell));
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }

    html.push_str("</tbody></table>");
    Ok(html)
}

/// Marker, typed value, formula, attribute blob and inline style of one cell
fn cell_attributes(cell: &GridCell, options: &CopyOptions) -> ClipboardResult<String> {
    let mut out = format!(" {}=\"{}\"", dialect::MARKER, dialect::MARKER_CELL);

    if !cell.is_empty() {
        let typed = dialect::encode_typed_value(cell.display_value());
        out.push_str(&format!(" {}=\"{}\"", dialect::SHEETS_VALUE, escape(typed.as_str())));
    }
    if cell.is_formula() {
        out.push_str(&format!(
            " {}=\"{}\"",
            dialect::FORMULA,
            escape(cell.expression.as_str())
        ));
    }

    if options.include_styles {
        let attrs = portable_attributes(&cell.attributes);
        if !attrs.is_empty() {
            let blob = serde_json::to_string(&attrs)?;
            out.push_str(&format!(" {}=\"{}\"", dialect::ATTRIBUTES, escape(blob.as_str())));
        }
        let style = attributes_to_style(&attrs);
        if !style.is_empty() {
            out.push_str(&format!(" style=\"{}\"", escape(style.as_str())));
        }
    }

    Ok(out)
}

/// Attributes without merge bookkeeping, which the table structure carries instead
fn portable_attributes(attrs: &Attributes) -> Attributes {
    attrs
        .iter()
        .filter(|(key, _)| {
            !matches!(
                key.as_str(),
                attributes::ROW_SPAN | attributes::COL_SPAN | attributes::MERGED_INTO
            )
        })
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

fn cell_text(cell: &GridCell) -> String {
    escape(cell.display_value())
        .split('\n')
        .collect::<Vec<_>>()
        .join("<br>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_core::merge_range;
    use pretty_assertions::assert_eq;

    fn sample() -> Grid {
        let mut grid = Grid::from_expressions(&[&["1", "two", "3"], &["4", "5", "6"]]);
        *grid.cell_mut(1, 2).unwrap() = GridCell::formula("=A1+B2", "6");
        grid
    }

    #[test]
    fn test_plain_text_uses_rendered_values() {
        let payload = serialize_selection(
            &sample(),
            &SheetSelection::parse("A1:C2").unwrap(),
            &CopyOptions::default(),
        )
        .unwrap();
        assert_eq!(payload.text, "1\ttwo\t3\n4\t5\t6");
    }

    #[test]
    fn test_custom_separators() {
        let options = CopyOptions {
            row_separator: "\r\n".into(),
            column_separator: ",".into(),
            ..CopyOptions::default()
        };
        let payload =
            serialize_selection(&sample(), &SheetSelection::parse("B1:C2").unwrap(), &options)
                .unwrap();
        assert_eq!(payload.text, "two,3\r\n5,6");
    }

    #[test]
    fn test_single_cell_is_a_span() {
        let mut grid = sample();
        grid.cell_mut(0, 1)
            .unwrap()
            .attributes
            .insert(attributes::BOLD.into(), attributes::TRUE.into());

        let payload = serialize_selection(
            &grid,
            &SheetSelection::parse("B1").unwrap(),
            &CopyOptions::cut("cut-7"),
        )
        .unwrap();
        assert_eq!(
            payload.html,
            "<span data-cellgrid-origin=\"B1\" data-cellgrid-cut=\"cut-7\" data-cellgrid=\"cell\" \
             data-sheets-value=\"{&quot;1&quot;:2,&quot;2&quot;:&quot;two&quot;}\" \
             data-cellgrid-attributes=\"{&quot;bold&quot;:&quot;true&quot;}\" \
             style=\"font-weight:bold\">two</span>"
        );
    }

    #[test]
    fn test_table_carries_formulas_and_merges() {
        let mut grid = sample();
        merge_range(&mut grid, &SheetSelection::parse("A1:B1").unwrap()).unwrap();

        let payload = serialize_selection(
            &grid,
            &SheetSelection::parse("B1:C2").unwrap(),
            &CopyOptions::default(),
        )
        .unwrap();

        // Touching B1 pulls in the whole A1:B1 block
        assert_eq!(payload.text, "1\t\t3\n4\t5\t6");
        assert!(payload.html.starts_with(
            "<table data-cellgrid=\"table\" data-cellgrid-origin=\"A1\"><tbody><tr><td colspan=\"2\""
        ));
        assert_eq!(payload.html.matches("<td").count(), 5);
        assert!(payload.html.contains("data-cellgrid-formula=\"=A1+B2\""));
    }

    #[test]
    fn test_text_is_escaped() {
        let grid = Grid::from_expressions(&[&["<b>&"], &["line\nbreak"]]);
        let payload = serialize_selection(
            &grid,
            &SheetSelection::parse("A1:A2").unwrap(),
            &CopyOptions::default(),
        )
        .unwrap();
        assert!(payload.html.contains(">&lt;b&gt;&amp;</td>"));
        assert!(payload.html.contains(">line<br>break</td>"));
    }

    #[test]
    fn test_out_of_bounds_selection_fails() {
        let result = serialize_selection(
            &sample(),
            &SheetSelection::parse("A1:Z9").unwrap(),
            &CopyOptions::default(),
        );
        assert!(result.is_err());
    }
}
