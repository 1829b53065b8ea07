//! Design-space geometry and scaling
//!
//! Region geometry is authored on a fixed design canvas (200×280 units by
//! default). These functions map it onto a rendered preview (pixels) or onto
//! a printed card (millimeters). The two axes scale independently so the
//! canvas can stretch to whatever aspect the grid produces.

use crate::constants::{REFERENCE_HEIGHT, REFERENCE_WIDTH};

/// A rectangle with a top-left origin, in whatever unit its context uses
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Same rectangle moved by `(dx, dy)`
    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Size of the design canvas in design units
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanvasSize {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: REFERENCE_WIDTH,
            height: REFERENCE_HEIGHT,
        }
    }
}

impl CanvasSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Both dimensions finite and positive
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Canvas matching a physical card's aspect, keeping the reference height
    pub fn fit_card(card_width_mm: f32, card_height_mm: f32) -> Self {
        if !CanvasSize::new(card_width_mm, card_height_mm).is_valid() {
            return Self::default();
        }
        Self {
            width: (REFERENCE_HEIGHT * card_width_mm / card_height_mm).round(),
            height: REFERENCE_HEIGHT,
        }
    }
}

/// Per-axis scale factors from design units to a target unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scale {
    pub x: f32,
    pub y: f32,
}

impl Scale {
    /// Scale that maps a canvas of `reference` size onto `target_width × target_height`
    pub fn between(reference: CanvasSize, target_width: f32, target_height: f32) -> Self {
        Self {
            x: target_width / reference.width,
            y: target_height / reference.height,
        }
    }

    pub fn identity() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    pub fn apply(&self, rect: &Rect) -> Rect {
        Rect::new(
            rect.x * self.x,
            rect.y * self.y,
            rect.width * self.x,
            rect.height * self.y,
        )
    }

    /// Undo [`Scale::apply`]
    pub fn invert(&self, rect: &Rect) -> Rect {
        Rect::new(
            rect.x / self.x,
            rect.y / self.y,
            rect.width / self.x,
            rect.height / self.y,
        )
    }
}

// =============================================================================
// Scaling
// =============================================================================

/// Map a design-space box onto a preview card rendered at the given pixel size.
///
/// No validation is performed: negative sizes pass through unchanged in sign.
pub fn to_preview_pixels(
    rect: &Rect,
    card_pixel_width: f32,
    card_pixel_height: f32,
    reference: CanvasSize,
) -> Rect {
    Scale::between(reference, card_pixel_width, card_pixel_height).apply(rect)
}

/// Map a design-space box onto a physical card of the given size in millimeters.
pub fn to_physical_units(
    rect: &Rect,
    card_physical_width: f32,
    card_physical_height: f32,
    reference: CanvasSize,
) -> Rect {
    Scale::between(reference, card_physical_width, card_physical_height).apply(rect)
}

/// Map a preview-pixel box back into design units.
pub fn from_preview_pixels(
    rect: &Rect,
    card_pixel_width: f32,
    card_pixel_height: f32,
    reference: CanvasSize,
) -> Rect {
    Scale::between(reference, card_pixel_width, card_pixel_height).invert(rect)
}

/// Physical card size for a page split into `columns × rows` inside a uniform margin.
pub fn card_size_mm(
    page_width_mm: f32,
    page_height_mm: f32,
    margin_mm: f32,
    columns: usize,
    rows: usize,
) -> (f32, f32) {
    let columns = columns.max(1) as f32;
    let rows = rows.max(1) as f32;
    (
        (page_width_mm - 2.0 * margin_mm) / columns,
        (page_height_mm - 2.0 * margin_mm) / rows,
    )
}

/// Clamp a dragged position so the region stays on the canvas.
///
/// A region larger than the canvas is pinned to the origin on that axis.
pub fn clamp_position(x: f32, y: f32, width: f32, height: f32, canvas: CanvasSize) -> (f32, f32) {
    let max_x = (canvas.width - width).max(0.0);
    let max_y = (canvas.height - height).max(0.0);
    (x.clamp(0.0, max_x), y.clamp(0.0, max_y))
}

// =============================================================================
// Tests
// =============================================================================
