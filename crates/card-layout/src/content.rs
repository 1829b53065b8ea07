//! Per-card content, kept structurally in step with the master template
//!
//! Values are bound to regions by position. After any region is added or
//! removed, [`CardContentStore::sync_structure`] pads or truncates every
//! card's value lists to the template's region counts. It never tries to
//! work out which old position corresponds to which new one, so removing a
//! region from the middle shifts later values up by one.

use crate::decode::ImageAsset;
use crate::template::{CardSide, ImageRegion, MasterTemplate, TextRegion};
use crate::types::{LayoutError, RegionKind, Result, Side};

/// Values for one side of one card
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideContent {
    /// One entry per template text region; empty = use the region label
    pub text_values: Vec<String>,
    /// One entry per template image region; `None` = use the template image
    pub image_values: Vec<Option<ImageAsset>>,
}

impl SideContent {
    fn shaped_like(side: &CardSide) -> Self {
        Self {
            text_values: vec![String::new(); side.text_regions().len()],
            image_values: vec![None; side.image_regions().len()],
        }
    }

    fn conform_to(&mut self, side: &CardSide) {
        self.text_values
            .resize(side.text_regions().len(), String::new());
        self.image_values.resize(side.image_regions().len(), None);
    }

    fn matches(&self, side: &CardSide) -> bool {
        self.text_values.len() == side.text_regions().len()
            && self.image_values.len() == side.image_regions().len()
    }

    /// True when no value has been entered
    pub fn is_empty(&self) -> bool {
        self.text_values.iter().all(String::is_empty) && self.image_values.iter().all(Option::is_none)
    }
}

/// Content of a single card instance
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardContent {
    pub index: usize,
    pub front: SideContent,
    pub back: SideContent,
}

impl CardContent {
    fn blank(index: usize, template: &MasterTemplate) -> Self {
        Self {
            index,
            front: SideContent::shaped_like(&template.front),
            back: SideContent::shaped_like(&template.back),
        }
    }

    pub fn side(&self, side: Side) -> &SideContent {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideContent {
        match side {
            Side::Front => &mut self.front,
            Side::Back => &mut self.back,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.front.is_empty() && self.back.is_empty()
    }
}

/// Ordered per-card content; length tracks the project's card count
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardContentStore {
    cards: Vec<CardContent>,
}

impl CardContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store of `count` blank cards shaped like `template`
    pub fn with_cards(count: usize, template: &MasterTemplate) -> Self {
        let mut store = Self::new();
        store.resize_to_actual_count(count, template);
        store
    }

    pub fn cards(&self) -> &[CardContent] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card(&self, index: usize) -> Result<&CardContent> {
        self.cards.get(index).ok_or(LayoutError::CardIndexOutOfRange {
            index,
            len: self.cards.len(),
        })
    }

    /// Grow with blank cards or drop the highest-index cards.
    ///
    /// Retained cards are never reordered or modified.
    pub fn resize_to_actual_count(&mut self, count: usize, template: &MasterTemplate) {
        if count < self.cards.len() {
            log::debug!("Dropping cards {}..{}", count, self.cards.len());
            self.cards.truncate(count);
        } else {
            for index in self.cards.len()..count {
                self.cards.push(CardContent::blank(index, template));
            }
        }
    }

    /// Pad or truncate every card's value lists to the template's region counts.
    ///
    /// Idempotent; safe to call redundantly.
    pub fn sync_structure(&mut self, template: &MasterTemplate) {
        let mut healed = 0;
        for card in &mut self.cards {
            for side in Side::BOTH {
                let template_side = template.side(side);
                let content = card.side_mut(side);
                if !content.matches(template_side) {
                    content.conform_to(template_side);
                    healed += 1;
                }
            }
        }
        if healed > 0 {
            log::debug!("Synchronized {} card sides with the template", healed);
        }
    }

    /// Whether every card matches the template's shape
    pub fn is_synchronized(&self, template: &MasterTemplate) -> bool {
        self.cards.iter().all(|card| {
            card.front.matches(&template.front) && card.back.matches(&template.back)
        })
    }

    fn slot_len(&self, card: usize, side: Side, kind: RegionKind) -> Result<usize> {
        let content = self.card(card)?.side(side);
        Ok(match kind {
            RegionKind::Text => content.text_values.len(),
            RegionKind::Image => content.image_values.len(),
        })
    }

    fn check_region(&self, card: usize, side: Side, kind: RegionKind, index: usize) -> Result<()> {
        let len = self.slot_len(card, side, kind)?;
        if index >= len {
            return Err(LayoutError::RegionIndexOutOfRange {
                side,
                kind,
                index,
                len,
            });
        }
        Ok(())
    }

    pub fn set_text_value(
        &mut self,
        card: usize,
        side: Side,
        index: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        self.check_region(card, side, RegionKind::Text, index)?;
        self.cards[card].side_mut(side).text_values[index] = value.into();
        Ok(())
    }

    /// Set or clear (`None`) a card's image for a region
    pub fn set_image_value(
        &mut self,
        card: usize,
        side: Side,
        index: usize,
        image: Option<ImageAsset>,
    ) -> Result<()> {
        self.check_region(card, side, RegionKind::Image, index)?;
        self.cards[card].side_mut(side).image_values[index] = image;
        Ok(())
    }

    /// Fill text values from tabular rows.
    ///
    /// Columns go to the front text regions in order, then to the back text
    /// regions. Extra columns are ignored; missing ones leave values as they are.
    /// Returns the number of cards touched.
    pub fn apply_text_rows(&mut self, rows: &[Vec<String>], template: &MasterTemplate) -> usize {
        let front_count = template.front.text_regions().len();
        let back_count = template.back.text_regions().len();

        let mut touched = 0;
        for (card, row) in self.cards.iter_mut().zip(rows) {
            let (front_cols, back_cols) = row.split_at(front_count.min(row.len()));
            for (slot, value) in card.front.text_values.iter_mut().zip(front_cols) {
                *slot = value.clone();
            }
            for (slot, value) in card.back.text_values.iter_mut().zip(back_cols.iter().take(back_count)) {
                *slot = value.clone();
            }
            touched += 1;
        }
        if rows.len() > touched {
            log::warn!(
                "Ignoring {} content rows beyond the {} cards in the project",
                rows.len() - touched,
                touched
            );
        }
        touched
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Text shown for a region: the card's value if non-empty, else the region label
pub fn resolve_text<'a>(region: &'a TextRegion, value: Option<&'a str>) -> &'a str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => &region.label,
    }
}

/// What an image region shows on a card
#[derive(Debug, Clone, PartialEq)]
pub enum ImageFill {
    /// Image supplied by the card itself
    Card(ImageAsset),
    /// Card supplied nothing; the template image stands in
    Template(ImageAsset),
    /// No image anywhere; show the region name instead
    Placeholder(String),
}

impl ImageFill {
    pub fn image(&self) -> Option<&ImageAsset> {
        match self {
            ImageFill::Card(image) | ImageFill::Template(image) => Some(image),
            ImageFill::Placeholder(_) => None,
        }
    }
}

pub fn resolve_image(region: &ImageRegion, value: Option<&ImageAsset>) -> ImageFill {
    match (value, &region.image) {
        (Some(image), _) => ImageFill::Card(image.clone()),
        (None, Some(image)) => ImageFill::Template(image.clone()),
        (None, None) => ImageFill::Placeholder(region.name.clone()),
    }
}

// =============================================================================
// Tests
// =============================================================================
