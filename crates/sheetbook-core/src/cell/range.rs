//! Rectangular cell ranges

use super::address::{row_col_to_cell_fast, CellAddress};
use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A rectangular range of cells (e.g., "A1:B10")
///
/// All four bounds are 0-based and inclusive. Construction always normalizes
/// the corners, so `top <= bottom` and `left <= right` hold for every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellRange {
    top: u32,
    left: u16,
    bottom: u32,
    right: u16,
}

impl CellRange {
    /// Create a range from row/column bounds, swapping reversed corners
    pub fn new(top: u32, left: u16, bottom: u32, right: u16) -> Self {
        Self {
            top: top.min(bottom),
            left: left.min(right),
            bottom: top.max(bottom),
            right: left.max(right),
        }
    }

    /// Create a range spanning two addresses
    pub fn from_addresses(start: CellAddress, end: CellAddress) -> Self {
        Self::new(start.row, start.col, end.row, end.col)
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self::new(addr.row, addr.col, addr.row, addr.col)
    }

    /// Parse a range from `A1:B2` notation; a lone cell like `C3` is accepted
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.split_once(':') {
            Some((start, end)) => {
                let start = CellAddress::parse(start)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                let end = CellAddress::parse(end)
                    .map_err(|e| Error::InvalidRange(format!("'{}': {}", s, e)))?;
                Ok(Self::from_addresses(start, end))
            }
            None => Ok(Self::single(CellAddress::parse(s)?)),
        }
    }

    /// First (top) row
    pub fn first_row(&self) -> u32 {
        self.top
    }

    /// Last (bottom) row
    pub fn last_row(&self) -> u32 {
        self.bottom
    }

    /// First (left) column
    pub fn first_column(&self) -> u16 {
        self.left
    }

    /// Last (right) column
    pub fn last_column(&self) -> u16 {
        self.right
    }

    /// Top-left corner
    pub fn top_left(&self) -> CellAddress {
        CellAddress::new(self.top, self.left)
    }

    /// Bottom-right corner
    pub fn bottom_right(&self) -> CellAddress {
        CellAddress::new(self.bottom, self.right)
    }

    /// Number of rows in the range
    pub fn row_count(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Number of columns in the range
    pub fn column_count(&self) -> u16 {
        self.right - self.left + 1
    }

    /// Check if a cell is within this range
    pub fn contains(&self, addr: &CellAddress) -> bool {
        (self.top..=self.bottom).contains(&addr.row) && (self.left..=self.right).contains(&addr.col)
    }

    /// Check if this range overlaps with another
    pub fn overlaps(&self, other: &CellRange) -> bool {
        self.top <= other.bottom
            && self.bottom >= other.top
            && self.left <= other.right
            && self.right >= other.left
    }

    /// Get the intersection of two ranges, if any
    pub fn intersect(&self, other: &CellRange) -> Option<CellRange> {
        if !self.overlaps(other) {
            return None;
        }
        Some(CellRange::new(
            self.top.max(other.top),
            self.left.max(other.left),
            self.bottom.min(other.bottom),
            self.right.min(other.right),
        ))
    }

    /// Iterate over all cell addresses in the range, row by row
    pub fn cells(&self) -> impl Iterator<Item = CellAddress> {
        let (left, right) = (self.left, self.right);
        (self.top..=self.bottom)
            .flat_map(move |row| (left..=right).map(move |col| CellAddress::new(row, col)))
    }

    /// Format as `A1:B10`, or `A1` for a single cell
    pub fn to_a1_string(&self) -> String {
        let start = row_col_to_cell_fast(self.top, self.left);
        if self.top == self.bottom && self.left == self.right {
            start
        } else {
            format!("{}:{}", start, row_col_to_cell_fast(self.bottom, self.right))
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_a1_string())
    }
}

impl FromStr for CellRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
