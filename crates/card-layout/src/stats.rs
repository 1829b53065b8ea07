use crate::grid::ProjectConfig;
use crate::render::has_back_page;
use crate::template::MasterTemplate;
use crate::types::*;

/// Calculate statistics for the current layout
pub fn calculate_statistics(config: &ProjectConfig, template: &MasterTemplate) -> LayoutStatistics {
    let max_slots = config.max_slots();
    let card_count = config.actual_card_count();
    let has_back_page = has_back_page(template);

    LayoutStatistics {
        max_slots,
        card_count,
        unused_slots: max_slots - card_count,
        front_text_regions: template.front.region_count(RegionKind::Text),
        front_image_regions: template.front.region_count(RegionKind::Image),
        back_text_regions: template.back.region_count(RegionKind::Text),
        back_image_regions: template.back.region_count(RegionKind::Image),
        has_back_page,
        page_count: if has_back_page { 2 } else { 1 },
    }
}
