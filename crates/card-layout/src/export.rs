//! Export planning: turn rendered cards into millimeter draw operations
//!
//! The planner decides *what* goes where on the page. Rasterizing glyphs,
//! wrapping lines inside the supplied width, and writing the file belong to
//! a [`DrawingSurface`] implementation.

use crate::constants::*;
use crate::content::CardContentStore;
use crate::decode::ImageAsset;
use crate::geometry::{CanvasSize, Rect, Scale};
use crate::grid::{GridPosition, ProjectConfig};
use crate::options::ExportOptions;
use crate::render::{ResolvedCard, has_back_page, render_cards};
use crate::template::MasterTemplate;
use crate::types::{Color, Result, Side};

// =============================================================================
// Plan Types
// =============================================================================

/// A run of text to be wrapped and drawn by the surface
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    /// Left edge (mm from the page's left edge)
    pub x_mm: f32,
    /// Baseline of the first line (mm from the page's top edge)
    pub baseline_mm: f32,
    /// Wrap width; `None` draws a single unwrapped line
    pub max_width_mm: Option<f32>,
    pub font_size_pt: f32,
    pub color: Color,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

/// One drawing step, in page millimeters with a top-left origin
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        color: Color,
        line_width_mm: f32,
    },
    Text(TextRun),
    Image {
        image: ImageAsset,
        rect: Rect,
        opacity_percent: u8,
    },
}

/// A card placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCard {
    pub slot: usize,
    pub position: GridPosition,
    pub side: Side,
    /// Card cell on the page (mm)
    pub bounds: Rect,
    pub ops: Vec<DrawOp>,
}

/// One page of the exported document
#[derive(Debug, Clone, PartialEq)]
pub struct PagePlan {
    pub side: Side,
    pub cards: Vec<PlannedCard>,
}

/// The complete exported document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentPlan {
    pub title: String,
    pub file_name: String,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub pages: Vec<PagePlan>,
}

impl DocumentPlan {
    /// Cards on the front page (= cards in the project)
    pub fn card_count(&self) -> usize {
        self.pages.first().map_or(0, |page| page.cards.len())
    }

    pub fn page(&self, side: Side) -> Option<&PagePlan> {
        self.pages.iter().find(|page| page.side == side)
    }

    /// Replay the plan onto a drawing surface, page by page
    pub fn render_to<S: DrawingSurface>(&self, surface: &mut S) -> std::result::Result<(), S::Error> {
        for page in &self.pages {
            surface.begin_page(self.page_width_mm, self.page_height_mm)?;
            for card in &page.cards {
                for op in &card.ops {
                    match op {
                        DrawOp::FillRect { rect, color } => surface.fill_rect(rect, *color)?,
                        DrawOp::StrokeRect {
                            rect,
                            color,
                            line_width_mm,
                        } => surface.stroke_rect(rect, *color, *line_width_mm)?,
                        DrawOp::Text(run) => surface.draw_text(run)?,
                        DrawOp::Image {
                            image,
                            rect,
                            opacity_percent,
                        } => surface.draw_image(image, rect, *opacity_percent)?,
                    }
                }
            }
        }
        Ok(())
    }
}

/// A page-oriented drawing backend (e.g. a PDF writer).
///
/// All coordinates are millimeters from the top-left corner of the current page.
pub trait DrawingSurface {
    type Error;

    fn begin_page(&mut self, width_mm: f32, height_mm: f32) -> std::result::Result<(), Self::Error>;

    fn fill_rect(&mut self, rect: &Rect, color: Color) -> std::result::Result<(), Self::Error>;

    fn stroke_rect(
        &mut self,
        rect: &Rect,
        color: Color,
        line_width_mm: f32,
    ) -> std::result::Result<(), Self::Error>;

    /// Draw text, wrapping it inside `run.max_width_mm` when set
    fn draw_text(&mut self, run: &TextRun) -> std::result::Result<(), Self::Error>;

    fn draw_image(
        &mut self,
        image: &ImageAsset,
        rect: &Rect,
        opacity_percent: u8,
    ) -> std::result::Result<(), Self::Error>;
}

// =============================================================================
// Planning
// =============================================================================

/// Plan the exported document: a front page, plus a back page when the back
/// differs from the front. Only slots holding cards are included.
pub fn plan_document(
    config: &ProjectConfig,
    template: &MasterTemplate,
    contents: &CardContentStore,
    options: &ExportOptions,
) -> Result<DocumentPlan> {
    options.validate()?;

    let (page_width_mm, page_height_mm) = options.page_dimensions_mm();
    let (card_width_mm, card_height_mm) = options.card_size_mm(config.grid());

    let mut sides = vec![Side::Front];
    if has_back_page(template) {
        sides.push(Side::Back);
    }

    let pages = sides
        .into_iter()
        .map(|side| {
            let cards = render_cards(config, template, contents, side)
                .iter()
                .map(|card| {
                    let bounds = Rect::new(
                        options.margin_mm + card.position.col as f32 * card_width_mm,
                        options.margin_mm + card.position.row as f32 * card_height_mm,
                        card_width_mm,
                        card_height_mm,
                    );
                    plan_card(card, bounds)
                })
                .collect();
            PagePlan { side, cards }
        })
        .collect::<Vec<_>>();

    log::debug!(
        "Planned {} page(s) with {} card(s) of {:.1}x{:.1} mm",
        pages.len(),
        config.actual_card_count(),
        card_width_mm,
        card_height_mm
    );

    Ok(DocumentPlan {
        title: config.name.clone(),
        file_name: options
            .file_name
            .clone()
            .unwrap_or_else(|| config.pdf_file_name()),
        page_width_mm,
        page_height_mm,
        pages,
    })
}

/// Draw operations for one card placed in `bounds` (mm)
pub fn plan_card(card: &ResolvedCard, bounds: Rect) -> PlannedCard {
    let scale = Scale::between(
        CanvasSize::new(card.width, card.height),
        bounds.width,
        bounds.height,
    );
    let scaled = card.scaled(&scale);

    let mut ops = vec![DrawOp::FillRect {
        rect: bounds,
        color: scaled.background_color,
    }];

    if let Some(image) = &scaled.background_image {
        ops.push(DrawOp::Image {
            image: image.clone(),
            rect: bounds,
            opacity_percent: 100,
        });
    }

    if scaled.border_width > 0.0 {
        ops.push(DrawOp::StrokeRect {
            rect: bounds,
            color: scaled.border_color,
            line_width_mm: scaled.border_width * BORDER_WIDTH_TO_MM,
        });
    }

    for text in &scaled.texts {
        let rect = text.geometry.offset(bounds.x, bounds.y);
        if let Some(color) = text.background_color {
            ops.push(DrawOp::FillRect { rect, color });
        }
        if let Some(color) = text.border_color {
            if text.border_width > 0.0 {
                ops.push(DrawOp::StrokeRect {
                    rect,
                    color,
                    line_width_mm: text.border_width * BORDER_WIDTH_TO_MM,
                });
            }
        }
        ops.push(DrawOp::Text(TextRun {
            text: text.text.clone(),
            x_mm: rect.x,
            baseline_mm: rect.y + pt_to_mm(text.font_size),
            max_width_mm: Some(rect.width),
            font_size_pt: text.font_size,
            color: text.font_color,
            font_family: text.font_family.clone(),
            bold: text.bold,
            italic: text.italic,
            underline: text.underline,
        }));
    }

    for image in &scaled.images {
        let rect = image.geometry.offset(bounds.x, bounds.y);
        // Placeholders are an on-screen affordance only
        if let Some(asset) = image.fill.image() {
            ops.push(DrawOp::Image {
                image: asset.clone(),
                rect,
                opacity_percent: image.opacity_percent,
            });
        }
        if image.border_width > 0.0 {
            ops.push(DrawOp::StrokeRect {
                rect,
                color: image.border_color,
                line_width_mm: image.border_width * BORDER_WIDTH_TO_MM,
            });
        }
    }

    if let Some(watermark) = &scaled.watermark {
        ops.push(DrawOp::Text(TextRun {
            text: watermark.clone(),
            x_mm: bounds.right() - WATERMARK_OFFSET_X_MM,
            baseline_mm: bounds.bottom() - WATERMARK_OFFSET_Y_MM,
            max_width_mm: None,
            font_size_pt: WATERMARK_FONT_SIZE_PT,
            color: Color::GRAY,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            bold: false,
            italic: false,
            underline: false,
        }));
    }

    PlannedCard {
        slot: card.slot,
        position: card.position,
        side: card.side,
        bounds,
        ops,
    }
}
