//! The editing session: config, template and content kept consistent
//!
//! [`CardProject`] owns the three stores and is the only place structural
//! edits happen. Every edit that can change a card count or a region count
//! reconciles the content store before returning, so the stores always agree.

use crate::content::CardContentStore;
use crate::decode::{DecodeTarget, DecodeTicket, DecodeTracker, ImageAsset, decode_image};
use crate::export::{DocumentPlan, plan_document};
use crate::geometry::CanvasSize;
use crate::grid::ProjectConfig;
use crate::options::ExportOptions;
use crate::render::{RenderedCard, ResolvedCard, has_back_page, render_cards, render_page};
use crate::stats::calculate_statistics;
use crate::template::MasterTemplate;
use crate::types::*;

#[derive(Debug, Clone)]
pub struct CardProject {
    config: ProjectConfig,
    template: MasterTemplate,
    contents: CardContentStore,
    decodes: DecodeTracker,
    active_side: Side,
}

impl Default for CardProject {
    fn default() -> Self {
        let config = ProjectConfig::default();
        let template = MasterTemplate::new();
        let contents = CardContentStore::with_cards(config.actual_card_count(), &template);
        Self {
            config,
            template,
            contents,
            decodes: DecodeTracker::new(),
            active_side: Side::Front,
        }
    }
}

impl CardProject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn template(&self) -> &MasterTemplate {
        &self.template
    }

    pub fn contents(&self) -> &CardContentStore {
        &self.contents
    }

    /// Side currently being designed
    pub fn active_side(&self) -> Side {
        self.active_side
    }

    pub fn set_active_side(&mut self, side: Side) {
        self.active_side = side;
    }

    /// Discard everything and start over with defaults.
    ///
    /// Decodes still in flight are abandoned. Sequence numbers keep counting
    /// so their tickets can never match a load started after the reset.
    pub fn reset(&mut self) {
        log::info!("Resetting project '{}'", self.config.name);
        let mut decodes = std::mem::take(&mut self.decodes);
        decodes.clear();
        *self = Self {
            decodes,
            ..Self::default()
        };
    }

    fn reconcile(&mut self) {
        self.contents
            .resize_to_actual_count(self.config.actual_card_count(), &self.template);
        self.contents.sync_structure(&self.template);
        debug_assert!(self.contents.len() == self.config.actual_card_count());
        debug_assert!(self.contents.is_synchronized(&self.template));
    }

    // -------------------------------------------------------------------------
    // Project configuration
    // -------------------------------------------------------------------------

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.config.name = name.into();
    }

    /// Change the grid; cards beyond the new capacity are dropped
    pub fn set_grid(&mut self, columns: usize, rows: usize) -> Result<()> {
        self.config.set_grid(columns, rows)?;
        self.reconcile();
        Ok(())
    }

    pub fn set_actual_card_count(&mut self, count: usize) -> Result<()> {
        self.config.set_actual_card_count(count)?;
        self.reconcile();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Template edits
    // -------------------------------------------------------------------------

    pub fn add_text_region(&mut self, side: Side) -> usize {
        let index = self.template.add_text_region(side);
        self.reconcile();
        index
    }

    pub fn add_image_region(&mut self, side: Side) -> usize {
        let index = self.template.add_image_region(side);
        self.reconcile();
        index
    }

    pub fn remove_region(&mut self, side: Side, kind: RegionKind, index: usize) -> Result<()> {
        self.template.remove_region(side, kind, index)?;
        self.reconcile();
        Ok(())
    }

    /// Apply an arbitrary edit to the template, then reconcile card content.
    pub fn edit_template<R>(&mut self, edit: impl FnOnce(&mut MasterTemplate) -> R) -> R {
        let result = edit(&mut self.template);
        self.reconcile();
        result
    }

    /// Fit the design canvas to the card aspect produced by `options`
    pub fn fit_canvas_to_page(&mut self, options: &ExportOptions) -> Result<()> {
        options.validate()?;
        let (card_width, card_height) = options.card_size_mm(self.config.grid());
        let canvas = CanvasSize::fit_card(card_width, card_height);
        log::debug!(
            "Fitting canvas to {:.1}x{:.1} mm cards: {}x{}",
            card_width,
            card_height,
            canvas.width,
            canvas.height
        );
        self.template.set_canvas(canvas)
    }

    // -------------------------------------------------------------------------
    // Card content
    // -------------------------------------------------------------------------

    pub fn set_text_value(
        &mut self,
        card: usize,
        side: Side,
        index: usize,
        value: impl Into<String>,
    ) -> Result<()> {
        self.contents.set_text_value(card, side, index, value)
    }

    pub fn set_image_value(
        &mut self,
        card: usize,
        side: Side,
        index: usize,
        image: Option<ImageAsset>,
    ) -> Result<()> {
        self.contents.set_image_value(card, side, index, image)
    }

    /// Fill text values from tabular rows (see [`CardContentStore::apply_text_rows`])
    pub fn apply_text_rows(&mut self, rows: &[Vec<String>]) -> usize {
        self.contents.apply_text_rows(rows, &self.template)
    }

    // -------------------------------------------------------------------------
    // Image loading
    // -------------------------------------------------------------------------

    /// Record that a decode for `target` has started
    pub fn begin_image_load(&mut self, target: DecodeTarget) -> DecodeTicket {
        self.decodes.begin(target)
    }

    /// Apply a finished decode.
    ///
    /// Returns `Ok(false)` when a newer load for the same target has started
    /// since; the result is then dropped. A failed decode leaves every store
    /// unchanged and is returned as the error.
    pub fn complete_image_load(
        &mut self,
        ticket: DecodeTicket,
        result: Result<ImageAsset>,
    ) -> Result<bool> {
        if !self.decodes.settle(&ticket) {
            log::debug!(
                "Discarding stale decode #{} for {:?}",
                ticket.sequence,
                ticket.target
            );
            return Ok(false);
        }

        let image = result.inspect_err(|e| {
            log::warn!("Image load for {:?} failed: {}", ticket.target, e);
        })?;

        match ticket.target {
            DecodeTarget::Background { side } => {
                self.template.side_mut(side).background_image = Some(image);
            }
            DecodeTarget::TemplateImage { side, index } => {
                self.template.attach_image(side, index, image)?;
            }
            DecodeTarget::CardImage { card, side, index } => {
                self.contents.set_image_value(card, side, index, Some(image))?;
            }
        }
        Ok(true)
    }

    /// Decode `bytes` and apply them to `target`
    pub async fn load_image(&mut self, target: DecodeTarget, bytes: Vec<u8>) -> Result<bool> {
        let ticket = self.begin_image_load(target);
        let result = decode_image(bytes).await;
        self.complete_image_load(ticket, result)
    }

    pub fn pending_image_loads(&self) -> usize {
        self.decodes.pending()
    }

    // -------------------------------------------------------------------------
    // Output
    // -------------------------------------------------------------------------

    pub fn render_page(&self, side: Side) -> Vec<RenderedCard> {
        render_page(&self.config, &self.template, &self.contents, side)
    }

    pub fn render_cards(&self, side: Side) -> Vec<ResolvedCard> {
        render_cards(&self.config, &self.template, &self.contents, side)
    }

    pub fn has_back_page(&self) -> bool {
        has_back_page(&self.template)
    }

    pub fn statistics(&self) -> LayoutStatistics {
        calculate_statistics(&self.config, &self.template)
    }

    pub fn plan_document(&self, options: &ExportOptions) -> Result<DocumentPlan> {
        plan_document(&self.config, &self.template, &self.contents, options)
    }
}

// =============================================================================
// Tests
// =============================================================================
