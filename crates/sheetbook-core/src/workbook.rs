//! Workbook type - the main document structure

use chrono::NaiveDateTime;

use crate::datetime::{datetime_from_serial, datetime_to_serial};
use crate::defined_name::{DefinedName, DefinedNames, NameScope};
use crate::drawing::{Drawing, SheetImage};
use crate::error::{Error, Result};
use crate::relationships::Relationships;
use crate::shared_strings::SharedStrings;
use crate::style::{Styles, Theme};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Default number format for date cells
pub const DEFAULT_DATE_FORMAT: &str = "yyyy-mm-dd";

/// A workbook (spreadsheet document)
///
/// The workbook owns its worksheets and hands out borrowed views only. Every
/// worksheet has a name that is unique (case-insensitively) and a sheet ID
/// that is allocated once from a counter and never reused, even after the
/// sheet is deleted.
#[derive(Debug)]
pub struct Workbook {
    /// Worksheets in tab order
    worksheets: Vec<Worksheet>,
    /// Workbook settings
    settings: WorkbookSettings,
    /// Active sheet index
    active_sheet: usize,
    /// Highest sheet ID handed out so far
    last_sheet_id: u32,
    /// Counter behind generated `Sheet<N>` names
    last_sheet_index: u32,
    /// Defined names
    defined_names: DefinedNames,
    /// Relationships of the workbook part, rebuilt on save
    relationships: Relationships,
    shared_strings: SharedStrings,
    styles: Styles,
    theme: Theme,
    /// Images collected by `prepare_drawings`, in reference-ID order
    images: Vec<SheetImage>,
    /// Drawings collected by `prepare_drawings`, one per sheet with images
    drawings: Vec<Drawing>,
}

impl Workbook {
    /// Create a new workbook with one worksheet named "Sheet1"
    pub fn new() -> Self {
        let mut wb = Self::empty();
        let name = wb.next_default_name();
        wb.insert_new(0, name);
        wb
    }

    /// Create an empty workbook with no worksheets
    ///
    /// Used as the target of a load; callers building documents should use
    /// [`Workbook::new`].
    pub fn empty() -> Self {
        Self {
            worksheets: Vec::new(),
            settings: WorkbookSettings::default(),
            active_sheet: 0,
            last_sheet_id: 0,
            last_sheet_index: 0,
            defined_names: DefinedNames::new(),
            relationships: Relationships::new(),
            shared_strings: SharedStrings::new(),
            styles: Styles::default(),
            theme: Theme::default(),
            images: Vec::new(),
            drawings: Vec::new(),
        }
    }

    /// Highest sheet ID handed out so far, including deleted sheets
    pub fn last_sheet_id(&self) -> u32 {
        self.last_sheet_id
    }

    /// Get the number of worksheets
    pub fn sheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Check if the workbook has no worksheets
    pub fn is_empty(&self) -> bool {
        self.worksheets.is_empty()
    }

    /// Get a worksheet by position
    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.worksheets.get(index)
    }

    /// Get a mutable worksheet by position
    pub fn worksheet_mut(&mut self, index: usize) -> Option<&mut Worksheet> {
        self.worksheets.get_mut(index)
    }

    /// Get a worksheet by name
    pub fn worksheet_by_name(&self, name: &str) -> Option<&Worksheet> {
        self.sheet_index(name).map(|i| &self.worksheets[i])
    }

    /// Get a worksheet by its durable sheet ID
    pub fn worksheet_by_id(&self, sheet_id: u32) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.sheet_id() == sheet_id)
    }

    /// Get the position of a worksheet by name
    pub fn sheet_index(&self, name: &str) -> Option<usize> {
        self.worksheets.iter().position(|ws| ws.name() == name)
    }

    /// Names of all worksheets in tab order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.worksheets.iter().map(|ws| ws.name()).collect()
    }

    /// Iterate over all worksheets
    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.worksheets.iter()
    }

    /// Iterate over all worksheets mutably
    pub fn worksheets_mut(&mut self) -> impl Iterator<Item = &mut Worksheet> {
        self.worksheets.iter_mut()
    }

    // ==================== Worksheet lifecycle ====================

    /// Append a worksheet with a generated `Sheet<N>` name
    ///
    /// The new sheet becomes active. Returns its position.
    pub fn add_worksheet(&mut self) -> Result<usize> {
        self.add_worksheet_with_name("")
    }

    /// Append a worksheet with the given name
    ///
    /// An empty name generates one. The new sheet becomes active.
    pub fn add_worksheet_with_name(&mut self, name: &str) -> Result<usize> {
        let index = self.worksheets.len();
        self.insert_worksheet(index, name)?;
        Ok(index)
    }

    /// Insert a worksheet at a specific position
    ///
    /// Same naming and ID rules as [`Workbook::add_worksheet_with_name`].
    pub fn insert_worksheet(&mut self, index: usize, name: &str) -> Result<usize> {
        if index > self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }

        let name = if name.is_empty() {
            self.next_default_name()
        } else {
            self.validate_sheet_name(name)?;
            name.to_string()
        };

        self.insert_new(index, name);
        Ok(index)
    }

    /// Append a worksheet that already has a sheet ID (used when loading)
    ///
    /// The ID counter is raised so that later sheets never collide with it.
    /// An ID of 0 or one already taken is replaced by a fresh one. A name that
    /// is taken gets a `"<name>(<n>)"` variant and an otherwise unusable name a
    /// generated `Sheet<N>`. The active sheet is left unchanged. Returns the
    /// position of the new sheet.
    pub fn add_worksheet_with_id(&mut self, name: &str, sheet_id: u32) -> usize {
        let name = match self.validate_sheet_name(name) {
            Ok(()) => name.to_string(),
            Err(Error::DuplicateSheetName(_)) => {
                let renamed = self.unique_variant(name);
                log::warn!("sheet name '{}' is already taken, using '{}'", name, renamed);
                renamed
            }
            Err(err) => {
                let renamed = self.next_default_name();
                log::warn!("unusable sheet name '{}' ({}), using '{}'", name, err, renamed);
                renamed
            }
        };

        let sheet_id = if sheet_id == 0 || self.worksheet_by_id(sheet_id).is_some() {
            log::warn!(
                "sheet '{}' has unusable sheet ID {}, allocating a new one",
                name,
                sheet_id
            );
            self.last_sheet_id + 1
        } else {
            sheet_id
        };
        self.last_sheet_id = self.last_sheet_id.max(sheet_id);

        self.worksheets.push(Worksheet::new(name, sheet_id));
        self.worksheets.len() - 1
    }

    /// Rename a worksheet, keeping its ID and position
    pub fn rename_worksheet(&mut self, index: usize, new_name: &str) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }

        self.validate_sheet_name_excluding(new_name, Some(index))?;

        self.worksheets[index].set_name(new_name);
        Ok(())
    }

    /// Remove the worksheet at `index`
    ///
    /// The last remaining worksheet cannot be deleted. Sheet IDs of the
    /// remaining worksheets are untouched.
    pub fn delete_worksheet(&mut self, index: usize) -> Result<()> {
        if self.worksheets.len() <= 1 {
            return Err(Error::LastSheetProtected);
        }
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }

        self.worksheets.remove(index);

        let last = self.worksheets.len() - 1;
        if self.active_sheet > index || self.active_sheet > last {
            self.active_sheet -= 1;
        }
        if self.settings.first_sheet > index || self.settings.first_sheet > last {
            self.settings.first_sheet -= 1;
        }

        Ok(())
    }

    /// Move a worksheet from `from` to `to`
    ///
    /// A destination past the end appends the sheet. The active sheet stays
    /// the same worksheet.
    pub fn move_worksheet(&mut self, from: usize, to: usize) -> Result<()> {
        if from == to {
            return Err(Error::InvalidMove(from));
        }
        if from >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(from, self.worksheets.len()));
        }

        let active_id = self.active_worksheet().map(|ws| ws.sheet_id());

        let worksheet = self.worksheets.remove(from);
        if to <= self.worksheets.len() {
            self.worksheets.insert(to, worksheet);
        } else {
            self.worksheets.push(worksheet);
        }

        if let Some(id) = active_id {
            if let Some(pos) = self.worksheets.iter().position(|ws| ws.sheet_id() == id) {
                self.active_sheet = pos;
            }
        }

        Ok(())
    }

    /// Duplicate the worksheet at `index` and append the copy
    ///
    /// An empty `new_name` generates `"<name>(<n>)"` with the smallest unused
    /// `n` starting at 2, shortening `<name>` when the result would be too
    /// long. Returns the position of the copy.
    pub fn copy_worksheet(&mut self, index: usize, new_name: &str) -> Result<usize> {
        let source = self
            .worksheets
            .get(index)
            .ok_or(Error::SheetOutOfBounds(index, self.worksheets.len()))?;

        let name = if new_name.is_empty() {
            self.unique_variant(source.name())
        } else {
            new_name.to_string()
        };
        self.validate_sheet_name(&name)?;

        let sheet_id = self.last_sheet_id + 1;
        let copy = self.worksheets[index].copy(&name, sheet_id);
        self.last_sheet_id = sheet_id;
        self.worksheets.push(copy);

        Ok(self.worksheets.len() - 1)
    }

    // ==================== Selection ====================

    /// Get the active sheet index
    pub fn active_sheet(&self) -> usize {
        self.active_sheet
    }

    /// Get the active worksheet
    pub fn active_worksheet(&self) -> Option<&Worksheet> {
        self.worksheets.get(self.active_sheet)
    }

    /// Set the active sheet index
    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.worksheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.worksheets.len()));
        }
        self.active_sheet = index;
        Ok(())
    }

    /// Get workbook settings
    pub fn settings(&self) -> &WorkbookSettings {
        &self.settings
    }

    /// Get mutable workbook settings
    pub fn settings_mut(&mut self) -> &mut WorkbookSettings {
        &mut self.settings
    }

    /// Check whether the workbook uses the 1904 date system
    pub fn is_date_1904(&self) -> bool {
        self.settings.date_1904
    }

    /// Switch between the 1900 and 1904 date systems
    ///
    /// Call this before writing any date values.
    pub fn set_date_1904(&mut self, date_1904: bool) {
        self.settings.date_1904 = date_1904;
    }

    /// Number format applied to date cells written without one
    pub fn default_date_format(&self) -> &str {
        &self.styles.default_date_format
    }

    /// Set the number format applied to date cells written without one
    pub fn set_default_date_format(&mut self, format: impl Into<String>) {
        self.styles.default_date_format = format.into();
    }

    /// Convert a date-time to a serial in this workbook's date system
    pub fn datetime_to_serial(&self, dt: NaiveDateTime) -> f64 {
        datetime_to_serial(dt, self.settings.date_1904)
    }

    /// Convert a serial in this workbook's date system to a date-time
    pub fn datetime_from_serial(&self, serial: f64) -> Option<NaiveDateTime> {
        datetime_from_serial(serial, self.settings.date_1904)
    }

    // ==================== Defined names ====================

    /// Define a name
    ///
    /// A leading `=` is stripped from `formula`. `scope` is the name of the
    /// worksheet the name is local to; an empty or unknown scope defines a
    /// workbook-wide name.
    ///
    /// # Example
    /// ```
    /// use sheetbook_core::{NameScope, Workbook};
    ///
    /// let mut wb = Workbook::new();
    /// wb.define_name("TaxRate", "=Sheet1!$B$1", "", "Sheet1");
    /// let name = wb.defined_names().iter().next().unwrap();
    /// assert_eq!(name.formula, "Sheet1!$B$1");
    /// assert_eq!(name.scope, NameScope::Sheet(1));
    /// ```
    pub fn define_name(&mut self, name: &str, formula: &str, comment: &str, scope: &str) {
        let scope = if scope.is_empty() {
            NameScope::Workbook
        } else {
            match self.worksheet_by_name(scope) {
                Some(ws) => NameScope::Sheet(ws.sheet_id()),
                None => {
                    log::debug!(
                        "scope '{}' of defined name '{}' matches no sheet, using workbook scope",
                        scope,
                        name
                    );
                    NameScope::Workbook
                }
            }
        };
        self.defined_names
            .push(DefinedName::new(name, formula, scope).with_comment(comment));
    }

    /// Position of the worksheet a scope refers to
    ///
    /// `None` for workbook scope and for scopes whose worksheet is gone.
    pub fn local_sheet_index(&self, scope: &NameScope) -> Option<usize> {
        let sheet_id = scope.sheet_id()?;
        self.worksheets
            .iter()
            .position(|ws| ws.sheet_id() == sheet_id)
    }

    /// Get the defined names (read-only)
    pub fn defined_names(&self) -> &DefinedNames {
        &self.defined_names
    }

    /// Get the defined names (mutable)
    pub fn defined_names_mut(&mut self) -> &mut DefinedNames {
        &mut self.defined_names
    }

    // ==================== Parts ====================

    /// Regenerate the relationship table from the current sheets and parts
    pub fn rebuild_relationships(&mut self) {
        let has_shared_strings = !self.shared_strings.is_empty();
        self.relationships
            .rebuild(self.worksheets.len(), has_shared_strings);
    }

    /// Relationship table as of the last rebuild
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// Shared string table
    pub fn shared_strings(&self) -> &SharedStrings {
        &self.shared_strings
    }

    /// Shared string table (mutable)
    pub fn shared_strings_mut(&mut self) -> &mut SharedStrings {
        &mut self.shared_strings
    }

    /// Style table
    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Style table (mutable)
    pub fn styles_mut(&mut self) -> &mut Styles {
        &mut self.styles
    }

    /// Theme
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Theme (mutable)
    pub fn theme_mut(&mut self) -> &mut Theme {
        &mut self.theme
    }

    /// Images collected by the last [`Workbook::prepare_drawings`]
    pub fn images(&self) -> &[SheetImage] {
        &self.images
    }

    /// Drawings collected by the last [`Workbook::prepare_drawings`]
    pub fn drawings(&self) -> &[Drawing] {
        &self.drawings
    }

    /// Number every image in the workbook before packaging
    ///
    /// Reference IDs start at 1 and increase across all sheets in tab order.
    /// Sheets without images get no drawing.
    pub fn prepare_drawings(&mut self) {
        self.images.clear();
        self.drawings.clear();
        let mut image_ref_id = 0;

        for sheet in &mut self.worksheets {
            if sheet.images().is_empty() {
                continue;
            }

            sheet.clear_extra_drawing_info();

            for idx in 0..sheet.images().len() {
                image_ref_id += 1;
                sheet.prepare_image(idx, image_ref_id);
                self.images.push(sheet.images()[idx].clone());
            }

            if let Some(drawing) = sheet.drawing() {
                self.drawings.push(drawing.clone());
            }
        }
    }

    // ==================== Internals ====================

    fn insert_new(&mut self, index: usize, name: String) {
        self.last_sheet_id += 1;
        self.worksheets
            .insert(index, Worksheet::new(name, self.last_sheet_id));
        self.active_sheet = index;
    }

    /// Next `Sheet<N>` name; the counter only moves forward
    fn next_default_name(&mut self) -> String {
        loop {
            self.last_sheet_index += 1;
            let name = format!("Sheet{}", self.last_sheet_index);
            if !self.name_in_use(&name, None) {
                return name;
            }
        }
    }

    /// `"<base>(<n>)"` with the smallest free `n` from 2, cut to the name limit
    fn unique_variant(&self, base: &str) -> String {
        let mut n = 2u32;
        loop {
            let suffix = format!("({})", n);
            let keep = MAX_SHEET_NAME_LEN.saturating_sub(suffix.len());
            let stem: String = base.chars().take(keep).collect();
            let candidate = format!("{}{}", stem, suffix);
            if !self.name_in_use(&candidate, None) {
                return candidate;
            }
            n += 1;
        }
    }

    fn name_in_use(&self, name: &str, exclude_index: Option<usize>) -> bool {
        let name_lower = name.to_lowercase();
        self.worksheets
            .iter()
            .enumerate()
            .any(|(i, ws)| Some(i) != exclude_index && ws.name().to_lowercase() == name_lower)
    }

    /// Validate a sheet name
    fn validate_sheet_name(&self, name: &str) -> Result<()> {
        self.validate_sheet_name_excluding(name, None)
    }

    /// Validate a sheet name, optionally excluding a sheet from duplicate check
    fn validate_sheet_name_excluding(
        &self,
        name: &str,
        exclude_index: Option<usize>,
    ) -> Result<()> {
        if name.is_empty() {
            return Err(Error::InvalidSheetName("Sheet name cannot be empty".into()));
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name too long (max {} characters)",
                MAX_SHEET_NAME_LEN
            )));
        }

        const INVALID_CHARS: &[char] = &[':', '\\', '/', '?', '*', '[', ']'];
        if let Some(c) = name.chars().find(|c| INVALID_CHARS.contains(c)) {
            return Err(Error::InvalidSheetName(format!(
                "Sheet name cannot contain '{}'",
                c
            )));
        }

        if self.name_in_use(name, exclude_index) {
            return Err(Error::DuplicateSheetName(name.into()));
        }

        Ok(())
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

/// Position and size of the application window, in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowGeometry {
    fn default() -> Self {
        Self {
            x: 240,
            y: 15,
            width: 16095,
            height: 9660,
        }
    }
}

/// Workbook-level settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkbookSettings {
    /// Date system: false = 1900 (Windows), true = 1904 (Mac)
    pub date_1904: bool,
    /// Convert numeric-looking strings to numbers when writing cells
    ///
    /// Carried for cell writers; the workbook part does not store it.
    pub strings_to_numbers: bool,
    /// Application window geometry
    pub window: WindowGeometry,
    /// First tab shown in the tab bar
    pub first_sheet: usize,
}

impl Default for WorkbookSettings {
    fn default() -> Self {
        Self {
            date_1904: false,
            strings_to_numbers: false,
            window: WindowGeometry::default(),
            first_sheet: 0,
        }
    }
}
