//! # sheetbook-core
//!
//! Document model of a spreadsheet workbook.
//!
//! This crate provides the types the workbook part of an XLSX package is built from:
//! - [`Workbook`] - ordered worksheets, book settings, defined names and part handles
//! - [`Worksheet`] - a sheet's identity (name, durable sheet ID, visibility) and content
//! - [`DefinedNames`] - named formulas, global or bound to a sheet ID
//! - [`Relationships`] - the workbook part's relationship table
//! - [`CellAddress`] and [`CellRange`] - A1 notation helpers
//!
//! ## Example
//!
//! ```rust
//! use sheetbook_core::Workbook;
//!
//! let mut workbook = Workbook::new();
//! workbook.add_worksheet_with_name("Data").unwrap();
//! workbook.copy_worksheet(1, "").unwrap();
//!
//! assert_eq!(workbook.sheet_names(), vec!["Sheet1", "Data", "Data(2)"]);
//! assert_eq!(workbook.worksheet(2).unwrap().sheet_id(), 3);
//! ```

pub mod cell;
pub mod datetime;
pub mod defined_name;
pub mod drawing;
pub mod error;
pub mod relationships;
pub mod shared_strings;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use cell::{CellAddress, CellRange};
pub use defined_name::{DefinedName, DefinedNames, NameScope};
pub use drawing::{Drawing, DrawingAnchor, SheetImage};
pub use error::{Error, Result};
pub use relationships::{Relationship, Relationships};
pub use shared_strings::SharedStrings;
pub use style::{Styles, Theme};
pub use workbook::{WindowGeometry, Workbook, WorkbookSettings};
pub use worksheet::{SheetState, Worksheet};

/// Maximum number of rows in a worksheet (Excel limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
