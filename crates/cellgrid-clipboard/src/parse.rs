//! Clipboard parsing
//!
//! HTML is tried dialect by dialect, first match wins: our own single cell, Excel, any
//! other table, bare paragraphs. Plain text is the fallback for everything else.

use crate::css::{declarations_to_attributes, parse_declarations};
use crate::dialect;
use crate::excel;
use crate::html::{find_all, find_first, find_where, parse_fragment, table_rows, Element, HtmlNode};
use crate::model::{ClipboardCell, ClipboardSource, ParsedClipboard};
use crate::options::PasteOptions;
use crate::r1c1::translate_r1c1;
use crate::spans::{col_span, normalize_spans, row_span, table_column_count, Slot};
use crate::tile::tile_cells;
use crate::values::coerce_value;
use cellgrid_core::attributes::{self, Attributes};
use cellgrid_core::{shift_formula_references, CellAddress};

/// Clipped `rowspan`/`colspan` of a table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Spans {
    pub rows: u32,
    pub cols: u32,
}

impl Spans {
    pub(crate) fn apply(self, cell: &mut ClipboardCell) {
        cell.row_span = (self.rows > 1 || self.cols > 1).then_some(self.rows);
        cell.col_span = (self.rows > 1 || self.cols > 1).then_some(self.cols);
    }
}

/// Parse clipboard content.
///
/// `html` and `text` are the `text/html` and `text/plain` flavors, either of which may be
/// missing. Empty input gives an empty result. When `options.fill_selection` is larger
/// than the parsed block, the block is tiled over it.
pub fn parse_clipboard(
    html: Option<&str>,
    text: Option<&str>,
    options: &PasteOptions,
) -> ParsedClipboard {
    let html = html.filter(|h| !h.trim().is_empty());
    let text = text.filter(|t| !t.trim().is_empty());

    let mut parsed = match (html, text) {
        (Some(_), Some(text)) if !options.prefer_html => parse_plain_text(text),
        (Some(html), _) => parse_html(html, text, options),
        (None, Some(text)) => parse_plain_text(text),
        (None, None) => ParsedClipboard::empty(),
    };

    if let Some(selection) = &options.fill_selection {
        let rect = selection.to_rectangle();
        if !parsed.is_empty() {
            parsed.cells = tile_cells(&parsed.cells, rect.height() as usize, rect.width() as usize);
        }
    }

    log::debug!(
        "parsed {:?} clipboard: {}x{}",
        parsed.source,
        parsed.height(),
        parsed.width()
    );
    parsed
}

/// Split text into rows on line breaks and cells on tabs.
///
/// A single trailing line break (as spreadsheets append) does not start another row.
pub fn parse_plain_text(text: &str) -> ParsedClipboard {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let body = normalized.strip_suffix('\n').unwrap_or(&normalized);
    if body.is_empty() {
        return ParsedClipboard::empty();
    }

    let cells = body
        .split('\n')
        .map(|line| line.split('\t').map(|v| Some(ClipboardCell::plain(v))).collect())
        .collect();
    ParsedClipboard::new(cells, ClipboardSource::PlainText)
}

fn parse_html(html: &str, text: Option<&str>, options: &PasteOptions) -> ParsedClipboard {
    let doc = parse_fragment(html);
    let cut_id = find_where(&doc, |n| n.attribute(dialect::CUT_ID).is_some())
        .and_then(|n| n.attribute(dialect::CUT_ID))
        .map(str::to_string);

    let mut parsed = parse_document(&doc, html, options).unwrap_or_else(|| {
        let rendered;
        let fallback = match text {
            Some(text) => text,
            None => {
                rendered = doc.inner_text();
                rendered.as_str()
            }
        };
        parse_plain_text(fallback)
    });

    parsed.cut_id = cut_id;
    parsed
}

fn parse_document(doc: &Element, html: &str, options: &PasteOptions) -> Option<ParsedClipboard> {
    if let Some(cell) = own_single_cell(doc, options) {
        log::debug!("clipboard holds a single cell of our own");
        return Some(ParsedClipboard::new(vec![vec![Some(cell)]], ClipboardSource::Own));
    }

    if excel::is_excel_document(doc) {
        log::debug!("clipboard holds Excel HTML");
        if let Some(cells) = excel::parse_excel(html) {
            return Some(ParsedClipboard::new(cells, ClipboardSource::Excel));
        }
    }

    if let Some(table) = find_first(doc, "table") {
        let own = table.attribute(dialect::MARKER) == Some(dialect::MARKER_TABLE);
        let cells = if own {
            let delta = origin_delta(table, options.active_cell);
            dense_cells(table, |node, _, spans| {
                let mut cell = decode_own_cell(node, delta);
                spans.apply(&mut cell);
                cell
            })
        } else {
            dense_cells(table, |node, at, spans| {
                let mut cell = decode_foreign_cell(node, offset(options.active_cell, at));
                spans.apply(&mut cell);
                cell
            })
        };
        if !cells.is_empty() {
            let source = if own {
                ClipboardSource::Own
            } else {
                ClipboardSource::Html
            };
            return Some(ParsedClipboard::new(cells, source));
        }
    }

    // Google Sheets copies a single cell as a bare span with typed metadata
    if let Some(span) = find_where(doc, |n| n.attribute(dialect::SHEETS_VALUE).is_some()) {
        let cell = decode_foreign_cell(span, options.active_cell);
        return Some(ParsedClipboard::new(vec![vec![Some(cell)]], ClipboardSource::Html));
    }

    let paragraphs = find_all(doc, "p");
    if paragraphs.iter().any(|p| !p.inner_text().trim().is_empty()) {
        let cells = paragraphs
            .iter()
            .map(|p| vec![Some(ClipboardCell::plain(p.inner_text()))])
            .collect();
        return Some(ParsedClipboard::new(cells, ClipboardSource::Paragraphs));
    }

    None
}

/// A cell of ours that is not inside a table
fn own_single_cell(doc: &Element, options: &PasteOptions) -> Option<ClipboardCell> {
    let node = find_where(doc, |n| {
        n.attribute(dialect::MARKER) == Some(dialect::MARKER_CELL) && !n.is("td") && !n.is("th")
    })?;
    let delta = origin_delta(node, options.active_cell);
    Some(decode_own_cell(node, delta))
}

/// `(rows, cols)` from the copied block's origin to the paste target
fn origin_delta<N: HtmlNode>(node: &N, target: CellAddress) -> (i64, i64) {
    let origin = node
        .attribute(dialect::ORIGIN)
        .and_then(|a1| a1.parse::<CellAddress>().ok());
    match origin {
        Some(origin) => (
            target.row as i64 - origin.row as i64,
            target.col as i64 - origin.col as i64,
        ),
        None => (0, 0),
    }
}

/// `origin` moved by a `(row, col)` position inside the pasted block, stopping at the
/// last addressable cell
fn offset(origin: CellAddress, at: (usize, usize)) -> CellAddress {
    let step = |base: u32, by: usize| base.saturating_add(u32::try_from(by).unwrap_or(u32::MAX));
    CellAddress::new(step(origin.col, at.1), step(origin.row, at.0))
}

/// Lay a table out densely and decode each physical cell.
///
/// `decode` gets the node, its `(row, col)` position and its clipped spans. Positions
/// covered by a merge root are `None`; covered positions of a cell that did not become a
/// merge root, and positions no cell reached, are empty cells.
pub(crate) fn dense_cells<'a, F>(table: &'a Element, mut decode: F) -> Vec<Vec<Option<ClipboardCell>>>
where
    F: FnMut(&'a Element, (usize, usize), Spans) -> ClipboardCell,
{
    let rows = table_rows(table);
    let width = table_column_count(table, &rows);
    let height = rows.len();
    let slots = normalize_spans(&rows, width);

    let mut out: Vec<Vec<Option<ClipboardCell>>> = Vec::with_capacity(height);
    for (r, row) in slots.iter().enumerate() {
        let mut cells = Vec::with_capacity(width);
        for (c, slot) in row.iter().enumerate() {
            let cell = match slot {
                Slot::Cell(node) => {
                    let node: &'a Element = node;
                    let spans = Spans {
                        rows: row_span(node).min(height - r) as u32,
                        cols: col_span(node).min(width - c) as u32,
                    };
                    Some(decode(node, (r, c), spans))
                }
                Slot::Covered { row, col } => {
                    let root = if *row == r {
                        cells.get(*col)
                    } else {
                        out.get(*row).and_then(|prev: &Vec<_>| prev.get(*col))
                    };
                    match root {
                        Some(Some(root)) if root.is_merge_root() => None,
                        _ => Some(ClipboardCell::default()),
                    }
                }
                Slot::Unknown => Some(ClipboardCell::default()),
            };
            cells.push(cell);
        }
        out.push(cells);
    }
    out
}

/// Attributes from an element's inline style
pub(crate) fn inline_attributes<N: HtmlNode>(node: &N) -> Attributes {
    node.attribute("style")
        .map(|style| declarations_to_attributes(&parse_declarations(style)))
        .unwrap_or_default()
}

/// Decode a cell we wrote, moving its formula from the copy origin to the paste target
fn decode_own_cell<N: HtmlNode>(node: &N, (d_row, d_col): (i64, i64)) -> ClipboardCell {
    let text = node.inner_text();

    let mut attrs = inline_attributes(node);
    if let Some(blob) = node.attribute(dialect::ATTRIBUTES) {
        match serde_json::from_str::<Attributes>(blob) {
            Ok(stored) => attrs.extend(stored),
            Err(e) => log::warn!("Ignoring malformed cell attributes '{}': {}", blob, e),
        }
    }

    let expression = match node.attribute(dialect::FORMULA) {
        Some(formula) => shift_formula_references(formula, d_row, d_col),
        None => node
            .attribute(dialect::SHEETS_VALUE)
            .and_then(dialect::decode_typed_value)
            .unwrap_or_else(|| text.clone()),
    };

    ClipboardCell {
        value: Some(text),
        expression,
        attributes: attrs,
        ..Default::default()
    }
}

/// Decode a cell from another application landing at `at`
fn decode_foreign_cell<N: HtmlNode>(node: &N, at: CellAddress) -> ClipboardCell {
    let text = node.inner_text();
    let mut attrs = inline_attributes(node);

    if let Some(format) = node
        .attribute(dialect::SHEETS_NUMBER_FORMAT)
        .and_then(dialect::decode_number_format)
    {
        attrs.insert(attributes::NUMBER_FORMAT.to_string(), format);
    }

    let expression = node
        .attribute(dialect::SHEETS_FORMULA)
        .map(|formula| translate_r1c1(formula, at))
        .or_else(|| {
            node.attribute(dialect::SHEETS_VALUE)
                .and_then(dialect::decode_typed_value)
        });

    let expression = match expression {
        Some(expression) => expression,
        None => {
            let coerced = coerce_value(&text);
            if let Some(format) = coerced.number_format {
                attrs
                    .entry(attributes::NUMBER_FORMAT.to_string())
                    .or_insert(format);
            }
            coerced.expression
        }
    };

    ClipboardCell {
        value: Some(text),
        expression,
        attributes: attrs,
        ..Default::default()
    }
}
