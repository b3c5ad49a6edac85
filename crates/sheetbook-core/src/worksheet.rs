//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::CellAddress;
use crate::drawing::{Drawing, DrawingAnchor, SheetImage};
use crate::error::Result;

/// Visibility of a sheet tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SheetState {
    /// Shown in the tab bar
    #[default]
    Visible,
    /// Hidden, can be unhidden from the UI
    Hidden,
    /// Hidden, can only be unhidden programmatically
    VeryHidden,
}

impl SheetState {
    /// Value of the `state` attribute in the workbook part
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetState::Visible => "visible",
            SheetState::Hidden => "hidden",
            SheetState::VeryHidden => "veryHidden",
        }
    }

    /// Parse a `state` attribute value; unknown values are treated as visible
    pub fn from_ooxml(s: &str) -> Self {
        match s {
            "hidden" => SheetState::Hidden,
            "veryHidden" => SheetState::VeryHidden,
            _ => SheetState::Visible,
        }
    }
}

/// A worksheet (single sheet in a workbook)
///
/// Worksheets are owned by their [`Workbook`](crate::Workbook). The name and
/// sheet ID can only be changed through the workbook, which keeps names unique
/// and IDs unused.
#[derive(Debug, Clone)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Durable sheet ID
    sheet_id: u32,
    /// Tab visibility
    state: SheetState,
    /// Cell text keyed by (row, col)
    cells: BTreeMap<(u32, u16), String>,
    /// Pictures placed on this sheet
    images: Vec<SheetImage>,
    /// Drawing part, created on first image
    drawing: Option<Drawing>,
}

impl Worksheet {
    pub(crate) fn new<S: Into<String>>(name: S, sheet_id: u32) -> Self {
        Self {
            name: name.into(),
            sheet_id,
            state: SheetState::Visible,
            cells: BTreeMap::new(),
            images: Vec::new(),
            drawing: None,
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    /// Get the durable sheet ID
    pub fn sheet_id(&self) -> u32 {
        self.sheet_id
    }

    /// Get the tab visibility state
    pub fn state(&self) -> SheetState {
        self.state
    }

    /// Set the tab visibility state
    pub fn set_state(&mut self, state: SheetState) {
        self.state = state;
    }

    /// Check if the sheet is hidden (either hidden or very hidden)
    pub fn is_hidden(&self) -> bool {
        self.state != SheetState::Visible
    }

    /// Hide or show the sheet
    pub fn set_hidden(&mut self, hidden: bool) {
        self.state = if hidden {
            SheetState::Hidden
        } else {
            SheetState::Visible
        };
    }

    // === Cell Access ===

    /// Set a cell's text by address string (e.g., "A1")
    pub fn set_cell_value<S: Into<String>>(&mut self, address: &str, value: S) -> Result<()> {
        let addr = CellAddress::parse(address)?;
        self.cells.insert((addr.row, addr.col), value.into());
        Ok(())
    }

    /// Get a cell's text by address string
    pub fn cell_value(&self, address: &str) -> Result<Option<&str>> {
        let addr = CellAddress::parse(address)?;
        Ok(self.cells.get(&(addr.row, addr.col)).map(String::as_str))
    }

    /// Number of non-empty cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    // === Images ===

    /// Place an image with its top-left corner at `anchor`
    ///
    /// Returns the image's index on this sheet.
    pub fn insert_image(&mut self, anchor: &str, data: Vec<u8>) -> Result<usize> {
        let anchor = CellAddress::parse(anchor)?;
        self.images.push(SheetImage::new(data, anchor));
        Ok(self.images.len() - 1)
    }

    /// Images on this sheet, in insertion order
    pub fn images(&self) -> &[SheetImage] {
        &self.images
    }

    /// The sheet's drawing part, if images have been prepared
    pub fn drawing(&self) -> Option<&Drawing> {
        self.drawing.as_ref()
    }

    /// Drop anchors and reference IDs from a previous packaging pass
    pub(crate) fn clear_extra_drawing_info(&mut self) {
        if let Some(drawing) = self.drawing.as_mut() {
            drawing.clear();
        }
        for image in &mut self.images {
            image.ref_id = None;
        }
    }

    /// Assign `ref_id` to the image at `index` and anchor it in the drawing
    pub(crate) fn prepare_image(&mut self, index: usize, ref_id: u32) {
        let Some(image) = self.images.get_mut(index) else {
            return;
        };
        image.ref_id = Some(ref_id);
        let anchor = DrawingAnchor {
            from: image.anchor,
            image_ref_id: ref_id,
        };
        self.drawing.get_or_insert_with(Drawing::new).push(anchor);
    }

    /// Duplicate this sheet's content under a new identity
    ///
    /// Images are copied without their reference IDs; the next
    /// `prepare_drawings` pass numbers them.
    pub(crate) fn copy(&self, name: &str, sheet_id: u32) -> Worksheet {
        let mut copy = Worksheet::new(name, sheet_id);
        copy.state = self.state;
        copy.cells = self.cells.clone();
        copy.images = self
            .images
            .iter()
            .map(|image| SheetImage::new(image.data.clone(), image.anchor))
            .collect();
        copy
    }
}
