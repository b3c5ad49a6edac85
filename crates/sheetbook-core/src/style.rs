//! Styles and theme handles
//!
//! The workbook part never looks inside these; it only emits relationships to
//! the parts they are serialized into.

/// Workbook style table handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Styles {
    /// Number format applied to date cells that have no explicit format
    pub default_date_format: String,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            default_date_format: crate::workbook::DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

/// Workbook theme handle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    /// Raw `theme1.xml` content carried through from a loaded file
    pub xml: Option<Vec<u8>>,
}

impl Theme {
    /// Check whether theme content was supplied
    pub fn is_custom(&self) -> bool {
        self.xml.is_some()
    }
}
