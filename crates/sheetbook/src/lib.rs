//! # sheetbook
//!
//! A spreadsheet workbook model with a reader and writer for the OOXML
//! workbook part.
//!
//! ## Features
//!
//! - Ordered worksheets with unique names and durable sheet IDs
//! - Defined names, global or scoped to a sheet
//! - 1900 and 1904 date systems
//! - Read and write `xl/workbook.xml` and its relationship part
//!
//! ## Example
//!
//! ```rust
//! use sheetbook::prelude::*;
//!
//! let mut workbook = Workbook::new();
//! workbook.add_worksheet_with_name("Data").unwrap();
//! workbook.define_name("Total", "=Data!$B$10", "", "Data");
//!
//! let xml = workbook.to_workbook_xml().unwrap();
//! let loaded = Workbook::from_workbook_xml(&xml).unwrap();
//!
//! assert_eq!(loaded.sheet_names(), vec!["Sheet1", "Data"]);
//! ```

pub mod prelude;

// Re-export core types
pub use sheetbook_core::{
    CellAddress,
    CellRange,
    DefinedName,
    DefinedNames,
    Drawing,
    DrawingAnchor,
    // Error types
    Error,
    NameScope,
    Relationship,
    Relationships,
    Result,
    SharedStrings,
    SheetImage,
    SheetState,
    Styles,
    Theme,
    WindowGeometry,
    // Main types
    Workbook,
    WorkbookSettings,
    Worksheet,

    MAX_COLS,
    // Constants
    MAX_ROWS,
    MAX_SHEET_NAME_LEN,
};

pub use sheetbook_core::datetime::{datetime_from_serial, datetime_to_serial, time_to_serial};

// Re-export I/O types
pub use sheetbook_xlsx::path::{relationships_path, split_path};
pub use sheetbook_xlsx::{
    SheetItemInfo, WorkbookPart, XlsxError, XlsxReader, XlsxResult, XlsxWriter, WORKBOOK_PART,
};

/// Extension trait for Workbook to add workbook part I/O
pub trait WorkbookExt: Sized {
    /// Load a workbook from the bytes of `xl/workbook.xml`
    fn from_workbook_xml(xml: &[u8]) -> XlsxResult<Self>;

    /// Serialize the workbook part, rebuilding the relationship table
    fn to_workbook_xml(&mut self) -> XlsxResult<Vec<u8>>;
}

impl WorkbookExt for Workbook {
    fn from_workbook_xml(xml: &[u8]) -> XlsxResult<Workbook> {
        XlsxReader::read_workbook_part(xml)
    }

    fn to_workbook_xml(&mut self) -> XlsxResult<Vec<u8>> {
        XlsxWriter::workbook_xml(self)
    }
}
