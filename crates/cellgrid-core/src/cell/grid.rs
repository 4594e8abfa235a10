//! Dense cell grid
//!
//! The grid is a rectangular `rows x cols` array of [`GridCell`]s. Cell identity is
//! positional. The hosting application owns the grid; the engine only reads it or
//! mutates merge metadata in place.

use super::{Attributes, CellAddress};
use crate::error::{Error, Result};
use crate::selection::SelectionRectangle;

/// Complete data for a single cell
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
pub struct GridCell {
    /// Rendered value; `None` for cells covered by a merge
    pub value: Option<String>,
    /// Formula (`=...`) or literal input text
    pub expression: String,
    /// Formatting and semantic flags
    pub attributes: Attributes,
    /// Rows spanned, set on merge roots only
    pub row_span: Option<u32>,
    /// Columns spanned, set on merge roots only
    pub col_span: Option<u32>,
    /// Root of the merged block this cell is covered by
    pub merged_into: Option<CellAddress>,
}

impl GridCell {
    /// Create a cell whose value mirrors its literal expression
    pub fn new<S: Into<String>>(expression: S) -> Self {
        let expression = expression.into();
        Self {
            value: Some(expression.clone()),
            expression,
            ..Default::default()
        }
    }

    /// Create a formula cell with its rendered value
    pub fn formula<E: Into<String>, V: Into<String>>(expression: E, value: V) -> Self {
        Self {
            value: Some(value.into()),
            expression: expression.into(),
            ..Default::default()
        }
    }

    /// Whether the expression is blank
    pub fn is_empty(&self) -> bool {
        self.expression.trim().is_empty()
    }

    /// Whether the expression is a formula
    pub fn is_formula(&self) -> bool {
        self.expression.starts_with('=')
    }

    /// Whether this cell is the root of a merged block
    pub fn is_merge_root(&self) -> bool {
        self.row_span.is_some() || self.col_span.is_some()
    }

    /// Rendered value, empty for covered cells
    pub fn display_value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Drop all merge metadata
    pub fn clear_merge(&mut self) {
        self.row_span = None;
        self.col_span = None;
        self.merged_into = None;
    }
}

/// Rectangular 2-D array of cells
///
/// Every row holds exactly `col_count` cells; deserialization rejects input that does not.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "GridData"))]
pub struct Grid {
    rows: Vec<Vec<GridCell>>,
    col_count: u32,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridData {
    rows: Vec<Vec<GridCell>>,
    col_count: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<GridData> for Grid {
    type Error = Error;

    fn try_from(data: GridData) -> Result<Self> {
        let expected = data.col_count as usize;
        if let Some((row, cells)) = data.rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(Error::InvalidRange(format!(
                "row {} has {} cells, expected {}",
                row + 1,
                cells.len(),
                expected
            )));
        }
        Ok(Self {
            rows: data.rows,
            col_count: data.col_count,
        })
    }
}

impl Grid {
    /// Create an empty grid of the given size
    pub fn new(row_count: u32, col_count: u32) -> Self {
        let rows = (0..row_count)
            .map(|_| vec![GridCell::default(); col_count as usize])
            .collect();
        Self { rows, col_count }
    }

    /// Build a grid from rows of cells, padding short rows with empty cells
    pub fn from_rows(mut rows: Vec<Vec<GridCell>>) -> Self {
        let col_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(col_count, GridCell::default());
        }
        Self {
            rows,
            col_count: col_count as u32,
        }
    }

    /// Build a grid of literal cells from expression text
    ///
    /// ```
    /// use cellgrid_core::Grid;
    ///
    /// let grid = Grid::from_expressions(&[&["a", "b"], &["", "=A1"]]);
    /// assert_eq!(grid.row_count(), 2);
    /// assert!(grid.cell(1, 0).unwrap().is_empty());
    /// ```
    pub fn from_expressions(rows: &[&[&str]]) -> Self {
        Self::from_rows(
            rows.iter()
                .map(|row| row.iter().map(|text| GridCell::new(*text)).collect())
                .collect(),
        )
    }

    /// Number of rows
    pub fn row_count(&self) -> u32 {
        self.rows.len() as u32
    }

    /// Number of columns
    pub fn col_count(&self) -> u32 {
        self.col_count
    }

    /// Get a cell by row/column
    pub fn cell(&self, row: u32, col: u32) -> Option<&GridCell> {
        self.rows.get(row as usize)?.get(col as usize)
    }

    /// Get a mutable cell by row/column
    pub fn cell_mut(&mut self, row: u32, col: u32) -> Option<&mut GridCell> {
        self.rows.get_mut(row as usize)?.get_mut(col as usize)
    }

    /// Get a cell by address
    pub fn get(&self, addr: CellAddress) -> Option<&GridCell> {
        self.cell(addr.row, addr.col)
    }

    /// Get a cell, failing for coordinates outside the grid
    pub fn try_cell(&self, row: u32, col: u32) -> Result<&GridCell> {
        self.cell(row, col).ok_or(Error::OutOfBounds {
            row,
            col,
            rows: self.row_count(),
            cols: self.col_count,
        })
    }

    /// Get a mutable cell, failing for coordinates outside the grid
    pub fn try_cell_mut(&mut self, row: u32, col: u32) -> Result<&mut GridCell> {
        let (rows, cols) = (self.row_count(), self.col_count);
        self.cell_mut(row, col).ok_or(Error::OutOfBounds {
            row,
            col,
            rows,
            cols,
        })
    }

    /// Whether the coordinate lies inside the grid
    pub fn in_bounds(&self, row: u32, col: u32) -> bool {
        row < self.row_count() && col < self.col_count
    }

    /// Fail unless the whole rectangle lies inside the grid
    pub fn check_rectangle(&self, rect: &SelectionRectangle) -> Result<()> {
        if self.in_bounds(rect.bottom, rect.right) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                row: rect.bottom,
                col: rect.right,
                rows: self.row_count(),
                cols: self.col_count,
            })
        }
    }

    /// Rectangle covering the whole grid, or `None` for an empty grid
    pub fn bounds(&self) -> Option<SelectionRectangle> {
        if self.rows.is_empty() || self.col_count == 0 {
            return None;
        }
        Some(SelectionRectangle::new(
            0,
            self.row_count() - 1,
            0,
            self.col_count - 1,
        ))
    }

    /// Iterate rows
    pub fn rows(&self) -> impl Iterator<Item = &[GridCell]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Consume the grid into its rows
    pub fn into_rows(self) -> Vec<Vec<GridCell>> {
        self.rows
    }
}
