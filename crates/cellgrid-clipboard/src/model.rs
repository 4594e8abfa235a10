//! Clipboard payloads and paste results

use cellgrid_core::attributes::{self, Attributes};
use cellgrid_core::{AttributeUpdate, CellAddress, Grid, GridCell, ValueUpdate};
use serde::Serialize;

/// Both clipboard flavors produced by a copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipboardPayload {
    /// `text/plain`: rendered values, tab and newline separated
    pub text: String,
    /// `text/html`: the rich dialect
    pub html: String,
}

/// A cell decoded from the clipboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardCell {
    /// Rendered text as it appeared in the source
    pub value: Option<String>,
    /// Input to store: a formula, a typed value or the text itself
    pub expression: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_span: Option<u32>,
}

impl ClipboardCell {
    /// A cell whose expression mirrors its text
    pub fn plain<S: Into<String>>(text: S) -> Self {
        let text = text.into();
        Self {
            value: Some(text.clone()),
            expression: text,
            ..Default::default()
        }
    }

    /// Whether the cell starts a merged block
    pub fn is_merge_root(&self) -> bool {
        self.row_span.map_or(false, |n| n > 1) || self.col_span.map_or(false, |n| n > 1)
    }
}

/// Which parser produced a paste result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClipboardSource {
    /// Copied from this application
    Own,
    /// Microsoft Excel HTML
    Excel,
    /// Any other HTML table (Google Sheets, LibreOffice, web pages)
    Html,
    /// HTML without a table, one paragraph per row
    Paragraphs,
    /// Tab separated text
    PlainText,
    /// Nothing usable on the clipboard
    Empty,
}

/// Grid edits that apply a paste
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PasteUpdates {
    pub value_updates: Vec<ValueUpdate>,
    pub attribute_updates: Vec<AttributeUpdate>,
}

/// Result of parsing clipboard content
///
/// `cells` is row-major. `None` marks a position covered by a merged cell above or to
/// the left; plain-text results may be jagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedClipboard {
    pub cells: Vec<Vec<Option<ClipboardCell>>>,
    pub source: ClipboardSource,
    /// Cut id of a cut made by this application
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cut_id: Option<String>,
}

impl ParsedClipboard {
    /// Nothing to paste
    pub fn empty() -> Self {
        Self {
            cells: Vec::new(),
            source: ClipboardSource::Empty,
            cut_id: None,
        }
    }

    pub fn new(cells: Vec<Vec<Option<ClipboardCell>>>, source: ClipboardSource) -> Self {
        Self {
            cells,
            source,
            cut_id: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|row| row.is_empty())
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    /// Width of the widest row
    pub fn width(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Cell at `(row, col)`, `None` when covered or outside a row
    pub fn cell(&self, row: usize, col: usize) -> Option<&ClipboardCell> {
        self.cells.get(row)?.get(col)?.as_ref()
    }

    /// Edits that write the paste with its top-left cell at `origin`.
    ///
    /// Merge roots carry their spans, covered positions are cleared and point back at
    /// their root, and every other cell gets its expression and attributes.
    pub fn updates(&self, origin: CellAddress) -> PasteUpdates {
        let mut updates = PasteUpdates::default();
        let roots = self.covering_roots(origin);

        for (r, row) in self.cells.iter().enumerate() {
            for (c, slot) in row.iter().enumerate() {
                let Some(addr) = origin.offset(c as i64, r as i64) else {
                    continue;
                };
                match slot {
                    Some(cell) => {
                        updates
                            .value_updates
                            .push(ValueUpdate::new(addr, Some(cell.expression.clone())));
                        for (key, value) in &cell.attributes {
                            updates
                                .attribute_updates
                                .push(AttributeUpdate::set(addr, key, value.clone()));
                        }
                        if cell.is_merge_root() {
                            updates.attribute_updates.extend([
                                AttributeUpdate::set(
                                    addr,
                                    attributes::ROW_SPAN,
                                    cell.row_span.unwrap_or(1).to_string(),
                                ),
                                AttributeUpdate::set(
                                    addr,
                                    attributes::COL_SPAN,
                                    cell.col_span.unwrap_or(1).to_string(),
                                ),
                            ]);
                        }
                    }
                    None => {
                        updates.value_updates.push(ValueUpdate::new(addr, None));
                        if let Some(root) = roots.get(&(r, c)) {
                            updates.attribute_updates.push(AttributeUpdate::set(
                                addr,
                                attributes::MERGED_INTO,
                                root.to_string(),
                            ));
                        }
                    }
                }
            }
        }

        updates
    }

    /// The paste as a standalone grid, padded to a rectangle, with merges applied
    pub fn to_grid(&self) -> Grid {
        let origin = CellAddress::new(0, 0);
        let roots = self.covering_roots(origin);

        let rows = self
            .cells
            .iter()
            .enumerate()
            .map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(|(c, slot)| match slot {
                        Some(cell) => GridCell {
                            value: cell.value.clone(),
                            expression: cell.expression.clone(),
                            attributes: cell.attributes.clone(),
                            row_span: cell.is_merge_root().then(|| cell.row_span.unwrap_or(1)),
                            col_span: cell.is_merge_root().then(|| cell.col_span.unwrap_or(1)),
                            merged_into: None,
                        },
                        None => GridCell {
                            merged_into: roots.get(&(r, c)).copied(),
                            ..Default::default()
                        },
                    })
                    .collect()
            })
            .collect();

        Grid::from_rows(rows)
    }

    /// Root address of each covered position, keyed by `(row, col)` within the paste
    fn covering_roots(&self, origin: CellAddress) -> ahash::AHashMap<(usize, usize), CellAddress> {
        let mut roots = ahash::AHashMap::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let Some(cell) = cell.as_ref().filter(|cell| cell.is_merge_root()) else {
                    continue;
                };
                let Some(root) = origin.offset(c as i64, r as i64) else {
                    continue;
                };
                let height = cell.row_span.unwrap_or(1) as usize;
                let width = cell.col_span.unwrap_or(1) as usize;
                for rr in r..r + height {
                    for cc in c..c + width {
                        if (rr, cc) != (r, c) {
                            roots.insert((rr, cc), root);
                        }
                    }
                }
            }
        }
        roots
    }
}
