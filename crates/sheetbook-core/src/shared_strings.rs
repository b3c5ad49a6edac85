//! Shared string table

use std::sync::Arc;

use ahash::AHashMap;

/// Deduplicated table of strings referenced by index from worksheets
///
/// The workbook part only asks whether the table is empty, to decide if the
/// shared-strings relationship is emitted.
#[derive(Debug, Default, Clone)]
pub struct SharedStrings {
    /// Strings in insertion order (the index is the `<si>` position)
    strings: Vec<Arc<str>>,
    /// Fast lookup for deduplication
    index_map: AHashMap<Arc<str>, u32>,
}

impl SharedStrings {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or add a string, returning its index
    pub fn add<S: AsRef<str>>(&mut self, s: S) -> u32 {
        let s = s.as_ref();
        if let Some(&idx) = self.index_map.get(s) {
            return idx;
        }
        let arc: Arc<str> = Arc::from(s);
        let idx = self.strings.len() as u32;
        self.strings.push(arc.clone());
        self.index_map.insert(arc, idx);
        idx
    }

    /// Get a string by index
    pub fn get(&self, index: u32) -> Option<&str> {
        self.strings.get(index as usize).map(|s| s.as_ref())
    }

    /// Number of unique strings
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Iterate over strings in index order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(|s| s.as_ref())
    }
}
