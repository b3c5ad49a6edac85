//! Image placement handles
//!
//! The workbook only needs to know which sheets carry images and to number
//! those images across the whole document before packaging. Geometry and
//! rendering live elsewhere.

use crate::cell::CellAddress;

/// An image anchored on a worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetImage {
    /// Encoded image bytes (PNG, JPEG, ...)
    pub data: Vec<u8>,
    /// Top-left anchor cell
    pub anchor: CellAddress,
    /// Workbook-wide image reference ID, assigned by `Workbook::prepare_drawings`
    pub ref_id: Option<u32>,
}

impl SheetImage {
    /// Create an image anchored at `anchor`
    pub fn new(data: Vec<u8>, anchor: CellAddress) -> Self {
        Self {
            data,
            anchor,
            ref_id: None,
        }
    }
}

/// One anchored picture inside a drawing part
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawingAnchor {
    /// Anchor cell
    pub from: CellAddress,
    /// Image reference ID this anchor points at
    pub image_ref_id: u32,
}

/// The drawing part belonging to one worksheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drawing {
    anchors: Vec<DrawingAnchor>,
}

impl Drawing {
    /// Create an empty drawing
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors in placement order
    pub fn anchors(&self) -> &[DrawingAnchor] {
        &self.anchors
    }

    pub(crate) fn push(&mut self, anchor: DrawingAnchor) {
        self.anchors.push(anchor);
    }

    pub(crate) fn clear(&mut self) {
        self.anchors.clear();
    }
}
