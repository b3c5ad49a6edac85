//! Cell address notation and column-letter arithmetic

use crate::error::{Error, Result};
use crate::{MAX_COLS, MAX_ROWS};
use std::fmt;
use std::str::FromStr;

/// Longest column name Excel accepts ("XFD")
const MAX_COLUMN_LETTERS: usize = 3;

/// Integer power, used for base-26 column arithmetic
///
/// ```
/// use sheetbook_core::cell::int_pow;
///
/// assert_eq!(int_pow(26, 0), 1);
/// assert_eq!(int_pow(26, 2), 676);
/// ```
pub fn int_pow(x: u32, p: u32) -> u32 {
    let mut result = 1;
    for _ in 0..p {
        result *= x;
    }
    result
}

/// A cell address (e.g., "A1", "$B$2")
///
/// Rows and columns are stored 0-based. The optional `$` prefix on either part
/// marks that part as absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellAddress {
    /// Row index (0-based internally, 1-based in display)
    pub row: u32,
    /// Column index (0-based, A=0, B=1, ..., XFD=16383)
    pub col: u16,
    /// Whether the row reference is absolute ($)
    pub row_absolute: bool,
    /// Whether the column reference is absolute ($)
    pub col_absolute: bool,
}

impl CellAddress {
    /// Create a new cell address with relative references
    pub fn new(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_absolute: false,
            col_absolute: false,
        }
    }

    /// Create a new cell address with specified absolute/relative flags
    pub fn with_absolute(row: u32, col: u16, row_absolute: bool, col_absolute: bool) -> Self {
        Self {
            row,
            col,
            row_absolute,
            col_absolute,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// # Examples
    /// ```
    /// use sheetbook_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("B3").unwrap();
    /// assert_eq!((addr.row, addr.col), (2, 1));
    ///
    /// let addr = CellAddress::parse("$B$2").unwrap();
    /// assert!(addr.row_absolute && addr.col_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        let col_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        let col = letters_to_column(&s[col_start..pos])?;

        let row_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;

        // Excel rows are 1-based, we use 0-based internally
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }
        let row = row - 1;
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }

        Ok(Self {
            row,
            col,
            row_absolute,
            col_absolute,
        })
    }

    /// Format as A1-style string, honoring the absolute markers
    pub fn to_a1_string(&self) -> String {
        row_col_to_cell(self.row, self.col, self.row_absolute, self.col_absolute)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert column index to letters (0 = A, 25 = Z, 26 = AA, etc.)
pub fn column_to_letters(col: u16) -> String {
    let mut letters = Vec::with_capacity(MAX_COLUMN_LETTERS);
    let mut n = col as u32 + 1;

    while n > 0 {
        n -= 1;
        letters.push((n % 26) as u8 + b'A');
        n /= 26;
    }

    letters.iter().rev().map(|&b| b as char).collect()
}

/// Convert column letters to a 0-based index (A = 0, Z = 25, AA = 26, etc.)
///
/// Letters are read as base-26 digits with no zero (A=1 .. Z=26).
pub fn letters_to_column(letters: &str) -> Result<u16> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".into()));
    }
    if letters.len() > MAX_COLUMN_LETTERS {
        return Err(Error::InvalidAddress(format!(
            "too many column letters in '{}'",
            letters
        )));
    }

    let mut value: u32 = 0;
    for (i, c) in letters.chars().rev().enumerate() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        value += digit * int_pow(26, i as u32);
    }

    let col = value - 1;
    if col >= MAX_COLS as u32 {
        return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
    }
    Ok(col as u16)
}

/// Convert "B3" style notation into a 0-based `(row, col)` pair
///
/// `$` markers are accepted and ignored.
pub fn cell_to_row_col(cell: &str) -> Result<(u32, u16)> {
    let addr = CellAddress::parse(cell)?;
    Ok((addr.row, addr.col))
}

/// Format a 0-based `(row, col)` pair, with independent `$` markers
///
/// ```
/// use sheetbook_core::cell::row_col_to_cell;
///
/// assert_eq!(row_col_to_cell(2, 1, false, false), "B3");
/// assert_eq!(row_col_to_cell(2, 1, true, false), "B$3");
/// assert_eq!(row_col_to_cell(2, 1, false, true), "$B3");
/// ```
pub fn row_col_to_cell(row: u32, col: u16, row_absolute: bool, col_absolute: bool) -> String {
    let mut result = String::with_capacity(12);
    if col_absolute {
        result.push('$');
    }
    result.push_str(&column_to_letters(col));
    if row_absolute {
        result.push('$');
    }
    result.push_str(&(row + 1).to_string());
    result
}

/// Format a 0-based `(row, col)` pair without absolute markers
pub fn row_col_to_cell_fast(row: u32, col: u16) -> String {
    format!("{}{}", column_to_letters(col), row + 1)
}
