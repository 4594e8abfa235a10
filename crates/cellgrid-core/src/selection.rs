//! Selection and rectangle algebra
//!
//! A [`SheetSelection`] keeps the two corners exactly as the user produced them, so
//! `start` may lie below or to the right of `end` (drag direction matters to callers).
//! A [`SelectionRectangle`] is the ordered form every geometric operation works on.

use crate::cell::{format_address, parse_address, CellAddress, ParsedAddress};
use crate::error::{Error, Result};
use std::fmt;

/// A selection with unordered corners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetSelection {
    /// Anchor corner
    pub start: CellAddress,
    /// Moving corner
    pub end: CellAddress,
}

impl SheetSelection {
    /// Create a selection from two corners
    pub const fn new(start: CellAddress, end: CellAddress) -> Self {
        Self { start, end }
    }

    /// Create a single-cell selection
    pub const fn single(addr: CellAddress) -> Self {
        Self {
            start: addr,
            end: addr,
        }
    }

    /// Create a selection from `(col, row)` pairs
    pub const fn from_coords(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start: CellAddress::new(start.0, start.1),
            end: CellAddress::new(end.0, end.1),
        }
    }

    /// Parse `A1:B2` (or a single `A1`) notation
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let (start, end) = s.split_once(':').unwrap_or((s, s));
        Ok(Self::new(parse_corner(start)?, parse_corner(end)?))
    }

    /// Ordered rectangle covering the same cells
    pub fn to_rectangle(&self) -> SelectionRectangle {
        SelectionRectangle {
            top: self.start.row.min(self.end.row),
            bottom: self.start.row.max(self.end.row),
            left: self.start.col.min(self.end.col),
            right: self.start.col.max(self.end.col),
        }
    }

    /// Same cells with `start` at the top-left and `end` at the bottom-right
    pub fn normalize(&self) -> Self {
        self.to_rectangle().to_selection()
    }

    /// Whether both selections cover the same cells, regardless of corner order
    pub fn covers_same_cells(&self, other: &SheetSelection) -> bool {
        self.to_rectangle() == other.to_rectangle()
    }

    /// Whether both corners are the same cell
    pub fn is_single_cell(&self) -> bool {
        self.start == self.end
    }

    /// Inclusive containment check
    pub fn contains(&self, row: u32, col: u32) -> bool {
        self.to_rectangle().contains(row, col)
    }

    /// Format as `A1:B2`, or `A1` for a single cell
    pub fn to_a1_string(&self) -> String {
        self.to_rectangle().to_a1_string()
    }
}

impl From<SelectionRectangle> for SheetSelection {
    fn from(rect: SelectionRectangle) -> Self {
        rect.to_selection()
    }
}

impl fmt::Display for SheetSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

fn parse_corner(s: &str) -> Result<CellAddress> {
    match parse_address(s)? {
        ParsedAddress::Cell { address, .. } => Ok(address),
        ParsedAddress::Sheet(sheet) => Ok(sheet.into()),
        ParsedAddress::Notebook { .. } => Err(Error::InvalidRange(format!(
            "notebook cell '{}' cannot bound a range",
            s
        ))),
    }
}

/// An ordered rectangle: `top <= bottom`, `left <= right`, all bounds inclusive
///
/// Deserialized rectangles are reordered the same way [`SelectionRectangle::new`] does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RectangleBounds"))]
pub struct SelectionRectangle {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RectangleBounds {
    top: u32,
    bottom: u32,
    left: u32,
    right: u32,
}

#[cfg(feature = "serde")]
impl From<RectangleBounds> for SelectionRectangle {
    fn from(b: RectangleBounds) -> Self {
        Self::new(b.top, b.bottom, b.left, b.right)
    }
}

impl SelectionRectangle {
    /// Create a rectangle, ordering each axis
    pub fn new(top: u32, bottom: u32, left: u32, right: u32) -> Self {
        Self {
            top: top.min(bottom),
            bottom: top.max(bottom),
            left: left.min(right),
            right: left.max(right),
        }
    }

    /// Rectangle covering a block of `height x width` cells anchored at `origin`,
    /// cut short at the largest addressable index
    pub fn from_origin(origin: CellAddress, height: u32, width: u32) -> Self {
        Self {
            top: origin.row,
            bottom: origin.row.saturating_add(height.max(1) - 1),
            left: origin.col,
            right: origin.col.saturating_add(width.max(1) - 1),
        }
    }

    /// Selection from the top-left to the bottom-right corner
    pub fn to_selection(&self) -> SheetSelection {
        SheetSelection {
            start: self.top_left(),
            end: self.bottom_right(),
        }
    }

    pub fn top_left(&self) -> CellAddress {
        CellAddress::new(self.left, self.top)
    }

    pub fn bottom_right(&self) -> CellAddress {
        CellAddress::new(self.right, self.bottom)
    }

    /// Number of rows (saturating at `u32::MAX`)
    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top).saturating_add(1)
    }

    /// Number of columns (saturating at `u32::MAX`)
    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left).saturating_add(1)
    }

    /// Total number of cells (saturating at `u64::MAX`)
    pub fn cell_count(&self) -> u64 {
        let rows = self.bottom.saturating_sub(self.top) as u64 + 1;
        let cols = self.right.saturating_sub(self.left) as u64 + 1;
        rows.saturating_mul(cols)
    }

    /// Inclusive containment check on all four edges
    pub fn contains(&self, row: u32, col: u32) -> bool {
        row >= self.top && row <= self.bottom && col >= self.left && col <= self.right
    }

    /// Whether `other` lies entirely inside this rectangle
    pub fn contains_rectangle(&self, other: &SelectionRectangle) -> bool {
        self.contains(other.top, other.left) && self.contains(other.bottom, other.right)
    }

    /// Check if this rectangle overlaps with another
    pub fn overlaps(&self, other: &SelectionRectangle) -> bool {
        self.top <= other.bottom
            && self.bottom >= other.top
            && self.left <= other.right
            && self.right >= other.left
    }

    /// Get the intersection of two rectangles, if any
    pub fn intersect(&self, other: &SelectionRectangle) -> Option<SelectionRectangle> {
        if !self.overlaps(other) {
            return None;
        }

        Some(SelectionRectangle {
            top: self.top.max(other.top),
            bottom: self.bottom.min(other.bottom),
            left: self.left.max(other.left),
            right: self.right.min(other.right),
        })
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &SelectionRectangle) -> SelectionRectangle {
        SelectionRectangle {
            top: self.top.min(other.top),
            bottom: self.bottom.max(other.bottom),
            left: self.left.min(other.left),
            right: self.right.max(other.right),
        }
    }

    /// Clip to a `rows x cols` grid; `None` if nothing remains
    pub fn clamp_to(&self, rows: u32, cols: u32) -> Option<SelectionRectangle> {
        if rows == 0 || cols == 0 || self.top >= rows || self.left >= cols {
            return None;
        }
        Some(SelectionRectangle {
            top: self.top,
            bottom: self.bottom.min(rows - 1),
            left: self.left,
            right: self.right.min(cols - 1),
        })
    }

    /// Iterate over all cell addresses in the rectangle (row by row)
    pub fn cells(&self) -> RectangleCells {
        RectangleCells {
            rect: *self,
            row: self.top,
            col: self.left,
            done: false,
        }
    }

    /// Format as `A1:B2`, or `A1` for a single cell
    pub fn to_a1_string(&self) -> String {
        let start = format_address(self.left, self.top, false, false);
        if self.height() == 1 && self.width() == 1 {
            start
        } else {
            format!(
                "{}:{}",
                start,
                format_address(self.right, self.bottom, false, false)
            )
        }
    }
}

impl From<SheetSelection> for SelectionRectangle {
    fn from(selection: SheetSelection) -> Self {
        selection.to_rectangle()
    }
}

impl fmt::Display for SelectionRectangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Iterator over the cells of a rectangle in row-major order
pub struct RectangleCells {
    rect: SelectionRectangle,
    row: u32,
    col: u32,
    done: bool,
}

impl Iterator for RectangleCells {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let addr = CellAddress::new(self.col, self.row);

        // Move to next cell
        if self.col < self.rect.right {
            self.col += 1;
        } else if self.row < self.rect.bottom {
            self.col = self.rect.left;
            self.row += 1;
        } else {
            self.done = true;
        }

        Some(addr)
    }
}

/// Normalize a selection; see [`SheetSelection::normalize`]
pub fn normalize(selection: &SheetSelection) -> SheetSelection {
    selection.normalize()
}

/// Compare selections by the cells they cover
pub fn selections_equal(a: &SheetSelection, b: &SheetSelection) -> bool {
    a.covers_same_cells(b)
}

/// Compare rectangles
pub fn rectangles_equal(a: &SelectionRectangle, b: &SelectionRectangle) -> bool {
    a == b
}

/// Parse `A1:B2`, or a single `A1`, keeping corner order as written
pub fn parse_range(s: &str) -> Result<SheetSelection> {
    SheetSelection::parse(s)
}

/// Format a selection as `A1:B2` with ordered corners
pub fn format_range(selection: &SheetSelection) -> String {
    selection.to_a1_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn sel(c1: u32, r1: u32, c2: u32, r2: u32) -> SheetSelection {
        SheetSelection::from_coords((c1, r1), (c2, r2))
    }

    #[test]
    fn test_parse_and_format_range() {
        assert_eq!(parse_range("C3:A1").unwrap(), sel(2, 2, 0, 0));
        assert_eq!(parse_range("B2").unwrap(), sel(1, 1, 1, 1));
        assert_eq!(format_range(&sel(2, 2, 0, 0)), "A1:C3");
        assert!(parse_range("A1:42").is_err());
    }

    #[test]
    fn test_to_rectangle_orders_corners() {
        let rect = sel(7, 10, 4, 4).to_rectangle();
        assert_eq!(
            rect,
            SelectionRectangle {
                top: 4,
                bottom: 10,
                left: 4,
                right: 7
            }
        );
        assert_eq!(rect.height(), 7);
        assert_eq!(rect.width(), 4);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(sel(3, 0, 1, 5).normalize(), sel(1, 0, 3, 5));
        assert_eq!(normalize(&sel(1, 0, 3, 5)), sel(1, 0, 3, 5));
    }

    #[test]
    fn test_equality_ignores_corner_order() {
        assert!(selections_equal(&sel(0, 0, 2, 2), &sel(2, 2, 0, 0)));
        assert!(selections_equal(&sel(2, 0, 0, 2), &sel(0, 2, 2, 0)));
        assert!(!selections_equal(&sel(0, 0, 2, 2), &sel(0, 0, 2, 3)));
        assert!(rectangles_equal(
            &sel(2, 0, 0, 2).to_rectangle(),
            &sel(0, 2, 2, 0).to_rectangle()
        ));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let rect = SelectionRectangle::new(1, 3, 1, 3);
        assert!(rect.contains(1, 1));
        assert!(rect.contains(3, 3));
        assert!(rect.contains(2, 2));
        assert!(!rect.contains(0, 0));
        assert!(!rect.contains(4, 1));
    }

    #[test]
    fn test_single_cell() {
        assert!(SheetSelection::single(CellAddress::new(4, 4)).is_single_cell());
        assert!(!sel(0, 0, 0, 1).is_single_cell());
    }

    #[test]
    fn test_cells_iterator() {
        let cells: Vec<_> = SelectionRectangle::new(0, 1, 0, 1).cells().collect();
        assert_eq!(
            cells,
            vec![
                CellAddress::new(0, 0),
                CellAddress::new(1, 0),
                CellAddress::new(0, 1),
                CellAddress::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_bounds_at_the_index_limit() {
        let edge = CellAddress::new(u32::MAX - 1, u32::MAX);
        let rect = SelectionRectangle::from_origin(edge, 5, 5);
        assert_eq!(rect, SelectionRectangle::new(u32::MAX, u32::MAX, u32::MAX - 1, u32::MAX));
        assert_eq!((rect.height(), rect.width()), (1, 2));

        // Fields are public, so an unordered rectangle can still be built by hand
        let inverted = SelectionRectangle { top: 9, bottom: 2, left: 5, right: 1 };
        assert_eq!((inverted.height(), inverted.width()), (1, 1));

        let whole = SelectionRectangle::new(0, u32::MAX, 0, u32::MAX);
        assert_eq!(whole.height(), u32::MAX);
        assert_eq!(whole.cell_count(), u64::MAX);
    }

    #[test]
    fn test_intersect_union_clamp() {
        let a = SelectionRectangle::new(0, 4, 0, 4);
        let b = SelectionRectangle::new(3, 8, 2, 9);
        assert_eq!(a.intersect(&b), Some(SelectionRectangle::new(3, 4, 2, 4)));
        assert_eq!(a.union(&b), SelectionRectangle::new(0, 8, 0, 9));
        assert_eq!(
            a.intersect(&SelectionRectangle::new(5, 6, 5, 6)),
            None
        );
        assert_eq!(b.clamp_to(6, 6), Some(SelectionRectangle::new(3, 5, 2, 5)));
        assert_eq!(b.clamp_to(2, 6), None);
    }

    #[test]
    fn test_parse_and_display() {
        let s = SheetSelection::parse("C3:A1").unwrap();
        assert_eq!(s, sel(2, 2, 0, 0));
        assert_eq!(s.to_string(), "A1:C3");
        assert_eq!(SheetSelection::parse("B2").unwrap(), sel(1, 1, 1, 1));
        assert!(SheetSelection::parse("5:A1").is_err());
    }

    proptest! {
        #[test]
        fn prop_normalize_idempotent(c1 in 0u32..500, r1 in 0u32..500, c2 in 0u32..500, r2 in 0u32..500) {
            let s = sel(c1, r1, c2, r2);
            prop_assert_eq!(s.normalize().normalize(), s.normalize());
            let rect = s.to_rectangle();
            prop_assert_eq!(rect.to_selection().to_rectangle(), rect);
        }
    }
}
