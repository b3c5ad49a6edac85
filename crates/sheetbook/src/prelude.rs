//! Prelude module - common imports for sheetbook users
//!
//! ```rust
//! use sheetbook::prelude::*;
//! ```

pub use crate::{
    CellAddress,
    CellRange,
    DefinedName,
    // Error types
    Error,
    NameScope,
    Result,
    SheetState,
    // Main types
    Workbook,
    // Extension traits
    WorkbookExt,
    WorkbookSettings,
    Worksheet,

    // I/O types
    XlsxError,
    XlsxReader,
    XlsxWriter,
};
