//! Layout rendering: merge template and content into card descriptors
//!
//! Rendering is a pure function of the current stores. Nothing derived is
//! cached, so descriptors are simply rebuilt whenever they are needed.

use crate::content::{CardContentStore, ImageFill, SideContent, resolve_image, resolve_text};
use crate::decode::ImageAsset;
use crate::geometry::{CanvasSize, Rect, Scale};
use crate::grid::{Grid, GridPosition, ProjectConfig};
use crate::template::MasterTemplate;
use crate::types::{Color, Side};

/// A text region with its content resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedText {
    pub region_id: u32,
    pub geometry: Rect,
    pub text: String,
    /// True when the card left the region empty and the label is shown
    pub from_label: bool,
    pub font_size: f32,
    pub font_color: Color,
    pub font_family: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub background_color: Option<Color>,
    pub border_color: Option<Color>,
    /// Design units
    pub border_width: f32,
}

/// An image region with its content resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedImage {
    pub region_id: u32,
    pub geometry: Rect,
    pub fill: ImageFill,
    /// Design units
    pub border_width: f32,
    pub border_color: Color,
    pub opacity_percent: u8,
}

/// One card of one side, ready to draw
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedCard {
    pub slot: usize,
    pub position: GridPosition,
    pub side: Side,
    /// Card width in the descriptor's unit (design units until scaled)
    pub width: f32,
    /// Card height in the descriptor's unit (design units until scaled)
    pub height: f32,
    pub background_color: Color,
    /// Design units
    pub border_width: f32,
    pub border_color: Color,
    pub watermark: Option<String>,
    pub background_image: Option<ImageAsset>,
    pub texts: Vec<ResolvedText>,
    pub images: Vec<ResolvedImage>,
    /// True when the card has no content of its own on this side
    pub blank: bool,
}

impl ResolvedCard {
    /// Copy with geometry and font sizes mapped through `scale`.
    ///
    /// Border widths stay in design units; each output converts them itself.
    pub fn scaled(&self, scale: &Scale) -> ResolvedCard {
        let mut card = self.clone();
        card.width *= scale.x;
        card.height *= scale.y;
        for text in &mut card.texts {
            text.geometry = scale.apply(&text.geometry);
            text.font_size *= scale.y;
        }
        for image in &mut card.images {
            image.geometry = scale.apply(&image.geometry);
        }
        card
    }

    /// Copy fitted to a preview card of `card_pixel_width × card_pixel_height`
    pub fn to_preview(&self, card_pixel_width: f32, card_pixel_height: f32) -> ResolvedCard {
        let reference = CanvasSize::new(self.width, self.height);
        self.scaled(&Scale::between(
            reference,
            card_pixel_width,
            card_pixel_height,
        ))
    }
}

/// A grid slot on a rendered page
#[derive(Debug, Clone, PartialEq)]
pub enum RenderedCard {
    /// Slot holds a card (possibly with blank content)
    Card(ResolvedCard),
    /// Slot lies beyond the project's card count
    Unused { slot: usize, position: GridPosition },
}

impl RenderedCard {
    pub fn slot(&self) -> usize {
        match self {
            RenderedCard::Card(card) => card.slot,
            RenderedCard::Unused { slot, .. } => *slot,
        }
    }

    pub fn is_unused(&self) -> bool {
        matches!(self, RenderedCard::Unused { .. })
    }

    pub fn as_card(&self) -> Option<&ResolvedCard> {
        match self {
            RenderedCard::Card(card) => Some(card),
            RenderedCard::Unused { .. } => None,
        }
    }
}

/// Whether the back needs its own page: its appearance differs from the
/// front, or it carries at least one region.
pub fn has_back_page(template: &MasterTemplate) -> bool {
    template.back.appearance_differs(&template.front) || template.back.has_regions()
}

/// Resolve one card's side against the template.
///
/// Missing values (content shorter than the template) resolve like empty ones.
pub fn render_card(
    template: &MasterTemplate,
    content: Option<&SideContent>,
    side: Side,
    slot: usize,
    grid: Grid,
) -> ResolvedCard {
    let card_side = template.side(side);
    let canvas = template.canvas();

    let texts = card_side
        .text_regions()
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let value = content
                .and_then(|c| c.text_values.get(i))
                .map(String::as_str);
            let text = resolve_text(region, value);
            ResolvedText {
                region_id: region.id,
                geometry: region.geometry,
                text: text.to_string(),
                from_label: value.is_none_or(str::is_empty),
                font_size: region.font_size,
                font_color: region.font_color,
                font_family: region.font_family.clone(),
                bold: region.bold,
                italic: region.italic,
                underline: region.underline,
                background_color: region.background_color,
                border_color: region.border_color,
                border_width: region.border_width,
            }
        })
        .collect();

    let images = card_side
        .image_regions()
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let value = content
                .and_then(|c| c.image_values.get(i))
                .and_then(Option::as_ref);
            ResolvedImage {
                region_id: region.id,
                geometry: region.geometry,
                fill: resolve_image(region, value),
                border_width: region.border_width,
                border_color: region.border_color,
                opacity_percent: region.opacity_percent,
            }
        })
        .collect();

    ResolvedCard {
        slot,
        position: grid.position(slot),
        side,
        width: canvas.width,
        height: canvas.height,
        background_color: card_side.background_color,
        border_width: card_side.border_width,
        border_color: card_side.border_color,
        watermark: (!card_side.watermark.is_empty()).then(|| card_side.watermark.clone()),
        background_image: card_side.background_image.clone(),
        texts,
        images,
        blank: content.is_none_or(SideContent::is_empty),
    }
}

/// Render every slot of one page side, row-major.
///
/// Returns `max_slots` entries: resolved cards for slots below the card count,
/// [`RenderedCard::Unused`] for the rest.
pub fn render_page(
    config: &ProjectConfig,
    template: &MasterTemplate,
    contents: &CardContentStore,
    side: Side,
) -> Vec<RenderedCard> {
    let grid = config.grid();
    (0..config.max_slots())
        .map(|slot| {
            if slot < config.actual_card_count() {
                let content = contents.cards().get(slot).map(|card| card.side(side));
                RenderedCard::Card(render_card(template, content, side, slot, grid))
            } else {
                RenderedCard::Unused {
                    slot,
                    position: grid.position(slot),
                }
            }
        })
        .collect()
}

/// Render only the slots that hold cards
pub fn render_cards(
    config: &ProjectConfig,
    template: &MasterTemplate,
    contents: &CardContentStore,
    side: Side,
) -> Vec<ResolvedCard> {
    render_page(config, template, contents, side)
        .into_iter()
        .filter_map(|rendered| match rendered {
            RenderedCard::Card(card) => Some(card),
            RenderedCard::Unused { .. } => None,
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::CardContentStore;

    fn setup(card_count: usize) -> (ProjectConfig, MasterTemplate, CardContentStore) {
        let mut config = ProjectConfig::default();
        config.set_actual_card_count(card_count).unwrap();
        let mut template = MasterTemplate::new();
        template.add_text_region(Side::Front);
        template.text_region_mut(Side::Front, 0).unwrap().label = "Name".to_string();
        let contents = CardContentStore::with_cards(card_count, &template);
        (config, template, contents)
    }

    #[test]
    fn test_render_page_marks_unused_slots() {
        let (config, template, mut contents) = setup(5);
        contents.set_text_value(2, Side::Front, 0, "Carol").unwrap();

        let page = render_page(&config, &template, &contents, Side::Front);
        assert_eq!(page.len(), 9);

        for (i, rendered) in page.iter().enumerate() {
            assert_eq!(rendered.slot(), i);
            assert_eq!(rendered.is_unused(), i >= 5);
        }

        let blank = page[0].as_card().unwrap();
        assert!(blank.blank);
        assert_eq!(blank.texts[0].text, "Name");
        assert!(blank.texts[0].from_label);

        let filled = page[2].as_card().unwrap();
        assert!(!filled.blank);
        assert_eq!(filled.texts[0].text, "Carol");
        assert!(!filled.texts[0].from_label);
        assert_eq!(filled.position, GridPosition::new(0, 2));

        assert_eq!(
            page[7],
            RenderedCard::Unused {
                slot: 7,
                position: GridPosition::new(2, 1)
            }
        );
    }

    #[test]
    fn test_back_page_predicate() {
        let mut template = MasterTemplate::new();
        template.front.background_color = Color::rgb(250, 240, 200);
        template.front.border_width = 4.0;
        template.front.watermark = "ACME".to_string();
        template.back = template.front.clone();
        template.add_text_region(Side::Front);
        assert!(!has_back_page(&template));

        template.back.watermark = "draft".to_string();
        assert!(has_back_page(&template));

        template.back.watermark = "ACME".to_string();
        assert!(!has_back_page(&template));
        template.add_image_region(Side::Back);
        assert!(has_back_page(&template));
    }

    #[test]
    fn test_back_page_renders_same_slot_order() {
        let (config, mut template, mut contents) = setup(4);
        template.add_text_region(Side::Back);
        contents.sync_structure(&template);
        contents.set_text_value(3, Side::Back, 0, "answer").unwrap();

        let back = render_page(&config, &template, &contents, Side::Back);
        assert_eq!(back.len(), 9);
        let card = back[3].as_card().unwrap();
        assert_eq!(card.side, Side::Back);
        assert_eq!(card.position, GridPosition::new(1, 0));
        assert_eq!(card.texts[0].text, "answer");
    }

    #[test]
    fn test_image_placeholder_and_template_fallback() {
        let (config, mut template, contents) = setup(1);
        template.add_image_region(Side::Front);
        let contents = {
            let mut contents = contents;
            contents.sync_structure(&template);
            contents
        };

        let page = render_page(&config, &template, &contents, Side::Front);
        let card = page[0].as_card().unwrap();
        assert_eq!(card.images[0].fill, ImageFill::Placeholder("Image 1".to_string()));
    }

    #[test]
    fn test_to_preview_scales_geometry_and_font() {
        let (config, template, contents) = setup(1);
        let card = render_cards(&config, &template, &contents, Side::Front).remove(0);
        let preview = card.to_preview(100.0, 140.0);

        assert_eq!(preview.width, 100.0);
        assert_eq!(preview.height, 140.0);
        assert_eq!(preview.texts[0].geometry, Rect::new(5.0, 5.0, 40.0, 15.0));
        assert_eq!(preview.texts[0].font_size, 6.0);
        assert_eq!(preview.border_width, card.border_width);
    }

    #[test]
    fn test_missing_content_resolves_as_blank() {
        let (config, template, _) = setup(3);
        let empty = CardContentStore::new();
        let page = render_page(&config, &template, &empty, Side::Front);
        let card = page[1].as_card().unwrap();
        assert!(card.blank);
        assert_eq!(card.texts[0].text, "Name");
    }
}
