//! Defined names
//!
//! A defined name binds a user-visible alias to a formula or reference. Local
//! names are bound to a worksheet's durable sheet ID rather than its position,
//! so they keep following the sheet through moves and renames.
//!
//! # Example
//!
//! ```text
//! // Define a name "TaxRate" that refers to cell B1 of Sheet1
//! workbook.define_name("TaxRate", "=Sheet1!$B$1", "", "");
//!
//! // Use it in a formula
//! =Price * TaxRate
//! ```

/// Scope of a defined name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NameScope {
    /// Available throughout the workbook (global)
    Workbook,
    /// Scoped to the worksheet with this sheet ID (local)
    Sheet(u32),
}

impl NameScope {
    /// Sheet ID of a local scope
    pub fn sheet_id(&self) -> Option<u32> {
        match self {
            NameScope::Workbook => None,
            NameScope::Sheet(id) => Some(*id),
        }
    }
}

/// A defined name
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DefinedName {
    /// The name (e.g., "SalesData", "TaxRate")
    pub name: String,
    /// Formula text, without a leading `=`
    pub formula: String,
    /// Optional comment
    pub comment: Option<String>,
    /// Scope of this name
    pub scope: NameScope,
}

impl DefinedName {
    /// Create a defined name, stripping one leading `=` from the formula
    pub fn new(name: impl Into<String>, formula: &str, scope: NameScope) -> Self {
        Self {
            name: name.into(),
            formula: formula.strip_prefix('=').unwrap_or(formula).to_string(),
            comment: None,
            scope,
        }
    }

    /// Attach a comment; an empty string leaves the name without one
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.comment = (!comment.is_empty()).then_some(comment);
        self
    }
}

/// Append-only, ordered list of defined names
#[derive(Debug, Default, Clone)]
pub struct DefinedNames {
    names: Vec<DefinedName>,
}

impl DefinedNames {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a defined name
    pub fn push(&mut self, name: DefinedName) {
        self.names.push(name);
    }

    /// Iterate in definition order
    pub fn iter(&self) -> impl Iterator<Item = &DefinedName> {
        self.names.iter()
    }

    /// Mutable access by definition order
    pub fn get_mut(&mut self, index: usize) -> Option<&mut DefinedName> {
        self.names.get_mut(index)
    }

    /// Number of defined names
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
