//! Cell coordinate utilities
//!
//! This module contains:
//! - [`CellAddress`] - A cell's location (e.g., "B3")
//! - [`CellRange`] - A rectangular range of cells (e.g., "A1:B10")
//! - Free functions converting between A1 notation and 0-based `(row, col)` pairs

mod address;
mod range;

pub use address::{
    cell_to_row_col, column_to_letters, int_pow, letters_to_column, row_col_to_cell,
    row_col_to_cell_fast, CellAddress,
};
pub use range::CellRange;
