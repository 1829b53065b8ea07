//! The master template: shared front/back design applied to every card
//!
//! Region collections are private so that adding or removing a region can
//! only happen through methods that the session pairs with a content sync.
//! Appearance fields are public and can be set directly.

use crate::constants::*;
use crate::decode::ImageAsset;
use crate::geometry::{CanvasSize, Rect, clamp_position};
use crate::types::{Color, LayoutError, RegionKind, Result, Side};

// =============================================================================
// Regions
// =============================================================================

/// A positioned text placeholder
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextRegion {
    /// Display identity, never reused within a template
    pub id: u32,
    /// Position and size in design units
    pub geometry: Rect,
    /// Shown when a card leaves this region empty
    pub label: String,
    pub font_size: f32,
    pub font_color: Color,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// `None` = transparent
    pub background_color: Option<Color>,
    /// `None` = no border
    pub border_color: Option<Color>,
    pub border_width: f32,
}

impl TextRegion {
    fn with_defaults(id: u32, canvas: CanvasSize) -> Self {
        Self {
            id,
            geometry: default_geometry(
                canvas,
                DEFAULT_TEXT_X,
                DEFAULT_TEXT_Y,
                DEFAULT_TEXT_WIDTH,
                DEFAULT_TEXT_HEIGHT,
            ),
            label: format!("Text {}", id),
            font_size: DEFAULT_FONT_SIZE,
            font_color: Color::BLACK,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            bold: false,
            italic: false,
            underline: false,
            background_color: None,
            border_color: None,
            border_width: 0.0,
        }
    }
}

/// A positioned image placeholder
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageRegion {
    /// Display identity, never reused within a template
    pub id: u32,
    /// Position and size in design units
    pub geometry: Rect,
    /// Shown in place of a missing image
    pub name: String,
    pub border_width: f32,
    pub border_color: Color,
    /// 0 (invisible) ..= 100 (opaque)
    pub opacity_percent: u8,
    /// `width / height` of the last attached image
    pub original_aspect_ratio: Option<f32>,
    /// Template image used when a card supplies none
    pub image: Option<ImageAsset>,
}

impl ImageRegion {
    fn with_defaults(id: u32, canvas: CanvasSize) -> Self {
        Self {
            id,
            geometry: default_geometry(
                canvas,
                DEFAULT_IMAGE_X,
                DEFAULT_IMAGE_Y,
                DEFAULT_IMAGE_WIDTH,
                DEFAULT_IMAGE_HEIGHT,
            ),
            name: format!("Image {}", id),
            border_width: 0.0,
            border_color: Color::BLACK,
            opacity_percent: 100,
            original_aspect_ratio: None,
            image: None,
        }
    }
}

/// Reference-canvas defaults stretched onto the current canvas
fn default_geometry(canvas: CanvasSize, x: f32, y: f32, width: f32, height: f32) -> Rect {
    let sx = canvas.width / REFERENCE_WIDTH;
    let sy = canvas.height / REFERENCE_HEIGHT;
    Rect::new(x * sx, y * sy, width * sx, height * sy)
}

// =============================================================================
// Card Side
// =============================================================================

/// One face of the master template
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardSide {
    pub background_color: Color,
    /// Border width in design units
    pub border_width: f32,
    pub border_color: Color,
    /// Empty = no watermark
    pub watermark: String,
    pub background_image: Option<ImageAsset>,
    text_regions: Vec<TextRegion>,
    image_regions: Vec<ImageRegion>,
}

impl Default for CardSide {
    fn default() -> Self {
        Self {
            background_color: Color::WHITE,
            border_width: DEFAULT_BORDER_WIDTH,
            border_color: Color::BLACK,
            watermark: String::new(),
            background_image: None,
            text_regions: Vec::new(),
            image_regions: Vec::new(),
        }
    }
}

impl CardSide {
    pub fn text_regions(&self) -> &[TextRegion] {
        &self.text_regions
    }

    pub fn image_regions(&self) -> &[ImageRegion] {
        &self.image_regions
    }

    pub fn region_count(&self, kind: RegionKind) -> usize {
        match kind {
            RegionKind::Text => self.text_regions.len(),
            RegionKind::Image => self.image_regions.len(),
        }
    }

    pub fn has_regions(&self) -> bool {
        !self.text_regions.is_empty() || !self.image_regions.is_empty()
    }

    /// Whether the card-level appearance (not the regions) differs from `other`
    pub fn appearance_differs(&self, other: &CardSide) -> bool {
        self.background_color != other.background_color
            || self.border_width != other.border_width
            || self.border_color != other.border_color
            || self.watermark != other.watermark
            || self.background_image != other.background_image
    }
}

// =============================================================================
// Master Template
// =============================================================================

/// The image region whose size edits honor the aspect lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImageSelection {
    pub side: Side,
    pub index: usize,
}

/// Front and back design shared by every card
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MasterTemplate {
    pub front: CardSide,
    pub back: CardSide,
    canvas: CanvasSize,
    next_text_id: u32,
    next_image_id: u32,
    selected_image: Option<ImageSelection>,
    aspect_locked: bool,
}

impl Default for MasterTemplate {
    fn default() -> Self {
        Self {
            front: CardSide::default(),
            back: CardSide::default(),
            canvas: CanvasSize::default(),
            next_text_id: 1,
            next_image_id: 1,
            selected_image: None,
            aspect_locked: false,
        }
    }
}

impl MasterTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn side(&self, side: Side) -> &CardSide {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut CardSide {
        match side {
            Side::Front => &mut self.front,
            Side::Back => &mut self.back,
        }
    }

    /// Design canvas every region is authored on
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Change the canvas, stretching every region proportionally per axis
    pub fn set_canvas(&mut self, canvas: CanvasSize) -> Result<()> {
        if !canvas.is_valid() {
            return Err(LayoutError::Config(format!(
                "Canvas must be positive, got {}x{}",
                canvas.width, canvas.height
            )));
        }
        let sx = canvas.width / self.canvas.width;
        let sy = canvas.height / self.canvas.height;
        for side in Side::BOTH {
            let card_side = self.side_mut(side);
            for region in &mut card_side.text_regions {
                region.geometry = stretch(&region.geometry, sx, sy);
            }
            for region in &mut card_side.image_regions {
                region.geometry = stretch(&region.geometry, sx, sy);
            }
        }
        self.canvas = canvas;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Structural mutations (callers must resync card content afterwards)
    // -------------------------------------------------------------------------

    /// Append a text region with default style; returns its position
    pub fn add_text_region(&mut self, side: Side) -> usize {
        let id = self.next_text_id;
        self.next_text_id += 1;
        let region = TextRegion::with_defaults(id, self.canvas);
        let regions = &mut self.side_mut(side).text_regions;
        regions.push(region);
        regions.len() - 1
    }

    /// Append an image region with default geometry; returns its position
    pub fn add_image_region(&mut self, side: Side) -> usize {
        let id = self.next_image_id;
        self.next_image_id += 1;
        let region = ImageRegion::with_defaults(id, self.canvas);
        let regions = &mut self.side_mut(side).image_regions;
        regions.push(region);
        regions.len() - 1
    }

    /// Remove a region by position (not identity)
    pub fn remove_region(&mut self, side: Side, kind: RegionKind, index: usize) -> Result<()> {
        let len = self.side(side).region_count(kind);
        if index >= len {
            return Err(LayoutError::RegionIndexOutOfRange {
                side,
                kind,
                index,
                len,
            });
        }

        match kind {
            RegionKind::Text => {
                self.side_mut(side).text_regions.remove(index);
            }
            RegionKind::Image => {
                self.side_mut(side).image_regions.remove(index);
                self.selected_image = match self.selected_image {
                    Some(sel) if sel.side == side && sel.index == index => None,
                    Some(sel) if sel.side == side && sel.index > index => Some(ImageSelection {
                        side,
                        index: sel.index - 1,
                    }),
                    other => other,
                };
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Region access
    // -------------------------------------------------------------------------

    pub fn text_region(&self, side: Side, index: usize) -> Result<&TextRegion> {
        let regions = &self.side(side).text_regions;
        regions.get(index).ok_or(LayoutError::RegionIndexOutOfRange {
            side,
            kind: RegionKind::Text,
            index,
            len: regions.len(),
        })
    }

    pub fn text_region_mut(&mut self, side: Side, index: usize) -> Result<&mut TextRegion> {
        let regions = &mut self.side_mut(side).text_regions;
        let len = regions.len();
        regions
            .get_mut(index)
            .ok_or(LayoutError::RegionIndexOutOfRange {
                side,
                kind: RegionKind::Text,
                index,
                len,
            })
    }

    pub fn image_region(&self, side: Side, index: usize) -> Result<&ImageRegion> {
        let regions = &self.side(side).image_regions;
        regions.get(index).ok_or(LayoutError::RegionIndexOutOfRange {
            side,
            kind: RegionKind::Image,
            index,
            len: regions.len(),
        })
    }

    pub fn image_region_mut(&mut self, side: Side, index: usize) -> Result<&mut ImageRegion> {
        let regions = &mut self.side_mut(side).image_regions;
        let len = regions.len();
        regions
            .get_mut(index)
            .ok_or(LayoutError::RegionIndexOutOfRange {
                side,
                kind: RegionKind::Image,
                index,
                len,
            })
    }

    fn geometry_mut(&mut self, side: Side, kind: RegionKind, index: usize) -> Result<&mut Rect> {
        Ok(match kind {
            RegionKind::Text => &mut self.text_region_mut(side, index)?.geometry,
            RegionKind::Image => &mut self.image_region_mut(side, index)?.geometry,
        })
    }

    /// Reposition a region, keeping it inside the canvas
    pub fn move_region(
        &mut self,
        side: Side,
        kind: RegionKind,
        index: usize,
        x: f32,
        y: f32,
    ) -> Result<()> {
        let canvas = self.canvas;
        let geometry = self.geometry_mut(side, kind, index)?;
        let (x, y) = clamp_position(x, y, geometry.width, geometry.height, canvas);
        geometry.x = x;
        geometry.y = y;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Images and aspect lock
    // -------------------------------------------------------------------------

    /// Attach a template image, snapping the region's height to the image aspect
    pub fn attach_image(&mut self, side: Side, index: usize, image: ImageAsset) -> Result<()> {
        let region = self.image_region_mut(side, index)?;
        if let Some(ratio) = image.aspect_ratio() {
            region.original_aspect_ratio = Some(ratio);
            region.geometry.height = (region.geometry.width / ratio).round();
        }
        region.image = Some(image);
        Ok(())
    }

    /// Drop a template image; the remembered aspect ratio is kept
    pub fn clear_image(&mut self, side: Side, index: usize) -> Result<()> {
        self.image_region_mut(side, index)?.image = None;
        Ok(())
    }

    pub fn selected_image_region(&self) -> Option<ImageSelection> {
        self.selected_image
    }

    /// Select an image region for editing, or clear the selection with `None`
    pub fn select_image_region(&mut self, selection: Option<ImageSelection>) -> Result<()> {
        if let Some(sel) = selection {
            self.image_region(sel.side, sel.index)?;
        }
        self.selected_image = selection;
        Ok(())
    }

    pub fn aspect_locked(&self) -> bool {
        self.aspect_locked
    }

    pub fn set_aspect_lock(&mut self, locked: bool) {
        self.aspect_locked = locked;
    }

    /// Ratio to enforce for size edits on this region, if the lock applies
    fn locked_ratio(&self, side: Side, index: usize) -> Option<f32> {
        let selected = self.selected_image == Some(ImageSelection { side, index });
        if !(self.aspect_locked && selected) {
            return None;
        }
        self.image_region(side, index)
            .ok()
            .and_then(|region| region.original_aspect_ratio)
    }

    pub fn set_image_width(&mut self, side: Side, index: usize, width: f32) -> Result<()> {
        let ratio = self.locked_ratio(side, index);
        let geometry = &mut self.image_region_mut(side, index)?.geometry;
        geometry.width = width;
        if let Some(ratio) = ratio {
            geometry.height = (width / ratio).round();
        }
        Ok(())
    }

    pub fn set_image_height(&mut self, side: Side, index: usize, height: f32) -> Result<()> {
        let ratio = self.locked_ratio(side, index);
        let geometry = &mut self.image_region_mut(side, index)?.geometry;
        geometry.height = height;
        if let Some(ratio) = ratio {
            geometry.width = (height * ratio).round();
        }
        Ok(())
    }

    /// Resize the selected image region by width, honoring the lock
    pub fn resize_selected_image(&mut self, width: f32) -> Result<()> {
        let sel = self
            .selected_image
            .ok_or(LayoutError::NoImageRegionSelected)?;
        self.set_image_width(sel.side, sel.index, width)
    }
}

fn stretch(rect: &Rect, sx: f32, sy: f32) -> Rect {
    Rect::new(rect.x * sx, rect.y * sy, rect.width * sx, rect.height * sy)
}

// =============================================================================
// Tests
// =============================================================================
