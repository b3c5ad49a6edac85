//! # sheetbook-xlsx
//!
//! Reader and writer for the workbook part (`xl/workbook.xml`) of an XLSX
//! package, plus the workbook's relationship part.
//!
//! ```rust
//! use sheetbook_core::Workbook;
//! use sheetbook_xlsx::{XlsxReader, XlsxWriter};
//!
//! let mut wb = Workbook::new();
//! wb.add_worksheet_with_name("Data").unwrap();
//! wb.set_date_1904(true);
//!
//! let xml = XlsxWriter::workbook_xml(&mut wb).unwrap();
//! let loaded = XlsxReader::read_workbook_part(&xml).unwrap();
//! assert_eq!(loaded.sheet_names(), vec!["Sheet1", "Data"]);
//! assert!(loaded.is_date_1904());
//! ```

pub mod error;
pub mod path;
pub mod reader;
pub mod writer;

mod xml;

pub use error::{XlsxError, XlsxResult};
pub use reader::{SheetItemInfo, WorkbookPart, XlsxReader};
pub use writer::XlsxWriter;

/// SpreadsheetML main namespace
pub const SPREADSHEETML_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Package relationships namespace
pub const PACKAGE_RELATIONSHIPS_NS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";

/// Location of the workbook part inside the package
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
