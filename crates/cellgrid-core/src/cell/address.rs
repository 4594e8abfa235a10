//! Cell address codec
//!
//! Converts between A1 notation and zero-based grid coordinates, and recognizes the
//! two other address shapes the host hands us: sheet-qualified tuples (`[col,row,sheet]`)
//! and bare-digit notebook cell ids.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A grid coordinate (0-based on both axes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Column index (A=0, B=1, ..., Z=25, AA=26)
    pub col: u32,
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
}

impl CellAddress {
    /// Create a new cell address
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }

    /// Parse a plain A1-style address (`"B7"`, `"$B$7"`), dropping the absolute markers.
    ///
    /// ```
    /// use cellgrid_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("AZ1").unwrap();
    /// assert_eq!(addr, CellAddress::new(51, 0));
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        match parse_address(s)? {
            ParsedAddress::Cell { address, .. } => Ok(address),
            other => Err(Error::InvalidAddress(format!(
                "'{}' is not an A1 address ({:?})",
                s, other
            ))),
        }
    }

    /// Format as an A1-style string without absolute markers
    pub fn to_a1_string(&self) -> String {
        format_address(self.col, self.row, false, false)
    }

    /// Offset this address, returning `None` if either axis would go negative
    pub fn offset(&self, d_col: i64, d_row: i64) -> Option<Self> {
        let col = u32::try_from(self.col as i64 + d_col).ok()?;
        let row = u32::try_from(self.row as i64 + d_row).ok()?;
        Some(Self { col, row })
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Result of reading the leading column letters of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnPrefix {
    /// Zero-based column index
    pub index: u32,
    /// Number of characters consumed
    pub length: usize,
}

/// A sheet-qualified coordinate, written as `[col,row,sheetId]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetAddress {
    pub col: u32,
    pub row: u32,
    pub sheet_id: u32,
}

impl From<(u32, u32, u32)> for SheetAddress {
    fn from((col, row, sheet_id): (u32, u32, u32)) -> Self {
        Self { col, row, sheet_id }
    }
}

impl From<SheetAddress> for CellAddress {
    fn from(addr: SheetAddress) -> Self {
        CellAddress::new(addr.col, addr.row)
    }
}

/// Any of the address shapes accepted by [`parse_address`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParsedAddress {
    /// Classic A1 / $A$1 form
    Cell {
        address: CellAddress,
        col_absolute: bool,
        row_absolute: bool,
    },
    /// Bracketed tuple form
    Sheet(SheetAddress),
    /// Bare-digit notebook cell id; there is no column
    Notebook { row: u32 },
}

impl ParsedAddress {
    /// Build from a native `[col, row, sheetId]` tuple
    pub fn from_tuple(tuple: (u32, u32, u32)) -> Self {
        ParsedAddress::Sheet(tuple.into())
    }

    /// Grid coordinate of this address, if it has one
    pub fn cell(&self) -> Option<CellAddress> {
        match *self {
            ParsedAddress::Cell { address, .. } => Some(address),
            ParsedAddress::Sheet(sheet) => Some(sheet.into()),
            ParsedAddress::Notebook { .. } => None,
        }
    }

    /// Whether this is a notebook cell id
    pub fn is_notebook_cell(&self) -> bool {
        matches!(self, ParsedAddress::Notebook { .. })
    }
}

/// Read the leading alphabetic run of `input` as bijective base-26 column letters.
///
/// Reading stops at the first digit, `$`, or any other non-letter. Returns `None`
/// when there are no leading letters or the index does not fit in a `u32`.
///
/// ```
/// use cellgrid_core::cell::{column_to_index, ColumnPrefix};
///
/// assert_eq!(column_to_index("AB4"), Some(ColumnPrefix { index: 27, length: 2 }));
/// ```
pub fn column_to_index(input: &str) -> Option<ColumnPrefix> {
    let mut index: u64 = 0;
    let mut length = 0;

    for b in input.bytes() {
        if !b.is_ascii_alphabetic() {
            break;
        }
        index = index * 26 + (b.to_ascii_uppercase() - b'A') as u64 + 1;
        if index > u32::MAX as u64 + 1 {
            return None;
        }
        length += 1;
    }

    if length == 0 {
        return None;
    }

    Some(ColumnPrefix {
        index: (index - 1) as u32,
        length,
    })
}

/// Convert a zero-based column index to letters (0 = A, 25 = Z, 26 = AA, 702 = AAA)
pub fn index_to_column(index: u32) -> String {
    let mut letters = Vec::new();
    let mut n = index;

    loop {
        letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }

    letters.reverse();
    // Only ASCII uppercase letters are pushed above
    String::from_utf8(letters).unwrap_or_default()
}

/// Format a coordinate in A1 notation, with optional `$` markers per axis
pub fn format_address(col: u32, row: u32, col_absolute: bool, row_absolute: bool) -> String {
    let mut result = String::new();

    if col_absolute {
        result.push('$');
    }
    result.push_str(&index_to_column(col));

    if row_absolute {
        result.push('$');
    }
    result.push_str(&(row as u64 + 1).to_string());

    result
}

/// Parse any of the recognized address shapes.
///
/// The first significant character decides the shape: `[` selects the tuple form,
/// a letter (optionally behind a `$`) selects A1 form, anything else is read as a
/// notebook cell id. Inputs that fit none of these are rejected.
///
/// ```
/// use cellgrid_core::cell::{parse_address, ParsedAddress, SheetAddress};
///
/// assert_eq!(
///     parse_address("[1,2,3]").unwrap(),
///     ParsedAddress::Sheet(SheetAddress { col: 1, row: 2, sheet_id: 3 })
/// );
/// ```
pub fn parse_address(input: &str) -> Result<ParsedAddress> {
    let s = input.trim();
    let first = match s.bytes().next() {
        Some(b) => b,
        None => return Err(Error::InvalidAddress("empty address".into())),
    };

    if first == b'[' {
        return parse_tuple(s);
    }

    let after_marker = s.strip_prefix('$').unwrap_or(s);
    let leads_with_letter = after_marker
        .bytes()
        .next()
        .map_or(false, |b| b.is_ascii_alphabetic());

    if !leads_with_letter {
        return parse_notebook(s);
    }

    parse_a1(s)
}

fn parse_a1(s: &str) -> Result<ParsedAddress> {
    let (col_absolute, rest) = match s.strip_prefix('$') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let prefix = column_to_index(rest)
        .ok_or_else(|| Error::InvalidAddress(format!("no column letters in '{}'", s)))?;
    let rest = &rest[prefix.length..];

    let (row_absolute, digits) = match rest.strip_prefix('$') {
        Some(digits) => (true, digits),
        None => (false, rest),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAddress(format!(
            "invalid row number in '{}'",
            s
        )));
    }

    let row: u32 = digits
        .parse()
        .map_err(|_| Error::InvalidAddress(format!("row number too large in '{}'", s)))?;

    // Rows are 1-based in A1 notation
    if row == 0 {
        return Err(Error::InvalidAddress(format!(
            "row number must be >= 1 in '{}'",
            s
        )));
    }

    Ok(ParsedAddress::Cell {
        address: CellAddress::new(prefix.index, row - 1),
        col_absolute,
        row_absolute,
    })
}

fn parse_tuple(s: &str) -> Result<ParsedAddress> {
    let inner = s
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| Error::InvalidAddress(format!("unterminated tuple '{}'", s)))?;

    let parts: Vec<u32> = inner
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| Error::InvalidAddress(format!("non-numeric tuple '{}'", s)))?;

    match parts.as_slice() {
        [col, row, sheet_id] => Ok(ParsedAddress::from_tuple((*col, *row, *sheet_id))),
        _ => Err(Error::InvalidAddress(format!(
            "tuple '{}' must have three members",
            s
        ))),
    }
}

fn parse_notebook(s: &str) -> Result<ParsedAddress> {
    if !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidAddress(format!(
            "'{}' is neither A1, tuple nor notebook form",
            s
        )));
    }

    let row = s
        .parse()
        .map_err(|_| Error::InvalidAddress(format!("notebook id too large in '{}'", s)))?;

    Ok(ParsedAddress::Notebook { row })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_column_to_index() {
        assert_eq!(
            column_to_index("AB4"),
            Some(ColumnPrefix {
                index: 27,
                length: 2
            })
        );
        assert_eq!(column_to_index("A1").map(|p| p.index), Some(0));
        assert_eq!(column_to_index("Z9").map(|p| p.index), Some(25));
        assert_eq!(column_to_index("AZ1").map(|p| p.index), Some(51));
        assert_eq!(column_to_index("BA1").map(|p| p.index), Some(52));
        assert_eq!(column_to_index("ZZ100").map(|p| p.index), Some(701));
        assert_eq!(column_to_index("AAA1").map(|p| p.index), Some(702));

        // Case insensitive, stops at $
        assert_eq!(
            column_to_index("ab$4"),
            Some(ColumnPrefix {
                index: 27,
                length: 2
            })
        );

        assert_eq!(column_to_index("12"), None);
        assert_eq!(column_to_index(""), None);
    }

    #[test]
    fn test_index_to_column() {
        assert_eq!(index_to_column(0), "A");
        assert_eq!(index_to_column(25), "Z");
        assert_eq!(index_to_column(26), "AA");
        assert_eq!(index_to_column(51), "AZ");
        assert_eq!(index_to_column(52), "BA");
        assert_eq!(index_to_column(701), "ZZ");
        assert_eq!(index_to_column(702), "AAA");
        assert_eq!(index_to_column(16383), "XFD");
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0, 0, false, false), "A1");
        assert_eq!(format_address(702, 0, false, false), "AAA1");
        assert_eq!(format_address(0, 0, true, true), "$A$1");
        assert_eq!(format_address(2, 9, true, false), "$C10");
        assert_eq!(format_address(2, 9, false, true), "C$10");
    }

    #[test]
    fn test_parse_a1() {
        assert_eq!(
            parse_address("ZZ100").unwrap(),
            ParsedAddress::Cell {
                address: CellAddress::new(701, 99),
                col_absolute: false,
                row_absolute: false,
            }
        );
        assert_eq!(
            parse_address("$A$1").unwrap(),
            ParsedAddress::Cell {
                address: CellAddress::new(0, 0),
                col_absolute: true,
                row_absolute: true,
            }
        );
        assert_eq!(
            parse_address("b$3").unwrap().cell(),
            Some(CellAddress::new(1, 2))
        );
    }

    #[test]
    fn test_parse_tuple_and_notebook() {
        assert_eq!(
            parse_address("[1,2,3]").unwrap(),
            ParsedAddress::Sheet(SheetAddress {
                col: 1,
                row: 2,
                sheet_id: 3
            })
        );
        assert_eq!(
            parse_address("[ 4, 5, 6 ]").unwrap().cell(),
            Some(CellAddress::new(4, 5))
        );
        assert_eq!(
            ParsedAddress::from_tuple((1, 2, 3)),
            parse_address("[1,2,3]").unwrap()
        );

        let nb = parse_address("12").unwrap();
        assert_eq!(nb, ParsedAddress::Notebook { row: 12 });
        assert!(nb.is_notebook_cell());
        assert_eq!(nb.cell(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_address("").is_err());
        assert!(parse_address("A").is_err());
        assert!(parse_address("A0").is_err());
        assert!(parse_address("A1B").is_err());
        assert!(parse_address("[1,2]").is_err());
        assert!(parse_address("[1,2,x]").is_err());
        assert!(parse_address("#1").is_err());
    }

    #[test]
    fn test_display_and_from_str() {
        assert_eq!(CellAddress::new(2, 99).to_string(), "C100");
        assert_eq!("C100".parse::<CellAddress>().unwrap(), CellAddress::new(2, 99));
        assert!("[1,2,3]".parse::<CellAddress>().is_err());
    }

    proptest! {
        #[test]
        fn prop_format_parse_round_trip(col in 0u32..100_000, row in 0u32..10_000_000) {
            let text = format_address(col, row, false, false);
            prop_assert_eq!(CellAddress::parse(&text).unwrap(), CellAddress::new(col, row));
        }

        #[test]
        fn prop_column_round_trip(index in 0u32..u32::MAX) {
            let letters = index_to_column(index);
            let prefix = column_to_index(&letters).unwrap();
            prop_assert_eq!(prefix.index, index);
            prop_assert_eq!(prefix.length, letters.len());
        }
    }
}
