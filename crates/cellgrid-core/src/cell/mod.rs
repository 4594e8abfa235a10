//! Cell-related types and utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location, and the A1 / tuple / notebook address codec
//! - [`GridCell`] - Value, expression, attributes and merge metadata of one cell
//! - [`Grid`] - The dense 2-D cell array
//! - [`attributes`] - Well-known attribute keys

mod address;
pub mod attributes;
mod grid;

pub use address::{
    column_to_index, format_address, index_to_column, parse_address, CellAddress, ColumnPrefix,
    ParsedAddress, SheetAddress,
};
pub use attributes::Attributes;
pub use grid::{Grid, GridCell};
