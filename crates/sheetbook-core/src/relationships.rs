//! Relationship table of the workbook part
//!
//! The table is derived from workbook state and rebuilt before every save; it
//! is never edited incrementally between saves.

/// Base URI of office-document relationship types
pub const OFFICE_DOCUMENT_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// One `(id, type, target)` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (`rId1`, `rId2`, ...)
    pub id: String,
    /// Full relationship type URI
    pub rel_type: String,
    /// Target path, relative to the source part's folder
    pub target: String,
}

/// Ordered relationship list
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Relationships {
    entries: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an office-document relationship of the given kind
    ///
    /// `kind` is the suffix of the type URI, e.g. `"/worksheet"`. IDs are
    /// assigned from the entry's position.
    pub fn add_document_relationship(&mut self, kind: &str, target: impl Into<String>) {
        let id = format!("rId{}", self.entries.len() + 1);
        self.entries.push(Relationship {
            id,
            rel_type: format!("{}{}", OFFICE_DOCUMENT_RELATIONSHIPS, kind),
            target: target.into(),
        });
    }

    /// Regenerate the table for the workbook part
    ///
    /// Order: one entry per worksheet, theme, styles, then shared strings
    /// when the table has content.
    pub fn rebuild(&mut self, worksheet_count: usize, has_shared_strings: bool) {
        self.entries.clear();
        for i in 0..worksheet_count {
            self.add_document_relationship("/worksheet", format!("worksheets/sheet{}.xml", i + 1));
        }
        self.add_document_relationship("/theme", "theme/theme1.xml");
        self.add_document_relationship("/styles", "styles.xml");
        if has_shared_strings {
            self.add_document_relationship("/sharedStrings", "sharedStrings.xml");
        }
        log::debug!(
            "rebuilt workbook relationships: {} entries",
            self.entries.len()
        );
    }

    /// Look up an entry by relationship ID
    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.entries.iter().find(|r| r.id == id)
    }

    /// Iterate in ID order
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
