use card_layout::constants::*;
use card_layout::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

fn project_with_name_label(card_count: usize) -> CardProject {
    let mut project = CardProject::new();
    project.set_actual_card_count(card_count).unwrap();
    project.add_text_region(Side::Front);
    project
        .edit_template(|template| {
            template.text_region_mut(Side::Front, 0).map(|region| {
                region.label = "Name".to_string();
            })
        })
        .unwrap();
    project
}

fn texts(card: &PlannedCard) -> Vec<&TextRun> {
    card.ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Text(run) => Some(run),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plan_includes_only_real_cards() {
    let project = project_with_name_label(5);
    let plan = project.plan_document(&ExportOptions::default()).unwrap();

    assert_eq!(plan.pages.len(), 1);
    assert_eq!(plan.card_count(), 5);
    assert_eq!(plan.file_name, "default.pdf");
    assert_eq!((plan.page_width_mm, plan.page_height_mm), (210.0, 297.0));

    for card in &plan.pages[0].cards {
        let texts = texts(card);
        assert_eq!(texts.len(), 1);
        assert_eq!(texts[0].text, "Name");
    }
}

#[test]
fn test_card_placement_and_draw_order() {
    let project = project_with_name_label(5);
    let plan = project.plan_document(&ExportOptions::default()).unwrap();
    let card = &plan.pages[0].cards[4];

    let card_width = 190.0 / 3.0;
    let card_height = 277.0 / 3.0;
    assert_eq!(card.position, GridPosition::new(1, 1));
    assert!(approx(card.bounds.x, 10.0 + card_width));
    assert!(approx(card.bounds.y, 10.0 + card_height));
    assert!(approx(card.bounds.width, card_width));

    assert!(matches!(
        card.ops[0],
        DrawOp::FillRect { color: Color::WHITE, .. }
    ));
    match &card.ops[1] {
        DrawOp::StrokeRect { line_width_mm, .. } => assert!(approx(*line_width_mm, 0.2)),
        other => panic!("Expected border stroke, got {:?}", other),
    }
    match &card.ops[2] {
        DrawOp::Text(run) => {
            let sx = card_width / 200.0;
            let sy = card_height / 280.0;
            let font_pt = 12.0 * sy;
            assert!(approx(run.font_size_pt, font_pt));
            assert!(approx(run.x_mm, card.bounds.x + 10.0 * sx));
            assert!(approx(
                run.baseline_mm,
                card.bounds.y + 10.0 * sy + pt_to_mm(font_pt)
            ));
            assert_eq!(run.max_width_mm.map(|w| approx(w, 80.0 * sx)), Some(true));
        }
        other => panic!("Expected text, got {:?}", other),
    }
    assert_eq!(card.ops.len(), 3);
}

#[test]
fn test_card_values_replace_labels() {
    let mut project = project_with_name_label(2);
    project.set_text_value(1, Side::Front, 0, "Bob").unwrap();
    let plan = project.plan_document(&ExportOptions::default()).unwrap();

    assert_eq!(texts(&plan.pages[0].cards[0])[0].text, "Name");
    assert_eq!(texts(&plan.pages[0].cards[1])[0].text, "Bob");
}

#[test]
fn test_watermark_position() {
    let mut project = project_with_name_label(1);
    project.edit_template(|template| template.front.watermark = "ACME".to_string());
    // Same appearance on both sides keeps the export to one page
    project.edit_template(|template| template.back.watermark = "ACME".to_string());

    let plan = project.plan_document(&ExportOptions::default()).unwrap();
    assert_eq!(plan.pages.len(), 1);

    let card = &plan.pages[0].cards[0];
    match card.ops.last().unwrap() {
        DrawOp::Text(run) => {
            assert_eq!(run.text, "ACME");
            assert!(approx(run.x_mm, card.bounds.right() - 15.0));
            assert!(approx(run.baseline_mm, card.bounds.bottom() - 2.0));
            assert_eq!(run.font_size_pt, WATERMARK_FONT_SIZE_PT);
            assert_eq!(run.color, Color::GRAY);
            assert_eq!(run.max_width_mm, None);
        }
        other => panic!("Expected watermark, got {:?}", other),
    }
}

#[test]
fn test_back_page_when_back_differs() {
    let mut project = project_with_name_label(5);
    project.add_text_region(Side::Back);
    project.set_text_value(2, Side::Back, 0, "answer").unwrap();

    let plan = project.plan_document(&ExportOptions::default()).unwrap();
    assert_eq!(plan.pages.len(), 2);

    let back = plan.page(Side::Back).unwrap();
    assert_eq!(back.cards.len(), 5);
    assert_eq!(back.cards[2].side, Side::Back);
    assert_eq!(texts(&back.cards[2])[0].text, "answer");
    assert_eq!(texts(&back.cards[0])[0].text, "Text 2");
}

#[test]
fn test_placeholders_are_not_exported() {
    let mut project = CardProject::new();
    project.set_actual_card_count(2).unwrap();
    project.add_image_region(Side::Front);
    project
        .set_image_value(1, Side::Front, 0, Some(ImageAsset::new(vec![0u8], 4, 4)))
        .unwrap();

    let plan = project.plan_document(&ExportOptions::default()).unwrap();
    let images = |card: &PlannedCard| {
        card.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Image { .. }))
            .count()
    };
    assert_eq!(images(&plan.pages[0].cards[0]), 0);
    assert_eq!(images(&plan.pages[0].cards[1]), 1);
}

#[test]
fn test_file_name_override_and_validation() {
    let project = project_with_name_label(1);
    let options = ExportOptions {
        file_name: Some("deck.pdf".to_string()),
        ..Default::default()
    };
    assert_eq!(project.plan_document(&options).unwrap().file_name, "deck.pdf");

    let options = ExportOptions {
        margin_mm: 200.0,
        ..Default::default()
    };
    assert!(matches!(
        project.plan_document(&options),
        Err(LayoutError::Config(_))
    ));
}

#[test]
fn test_landscape_pages() {
    let project = project_with_name_label(1);
    let options = ExportOptions {
        orientation: Orientation::Landscape,
        ..Default::default()
    };
    let plan = project.plan_document(&options).unwrap();
    assert_eq!((plan.page_width_mm, plan.page_height_mm), (297.0, 210.0));
}

#[derive(Default)]
struct RecordingSurface {
    pages: usize,
    fills: usize,
    strokes: usize,
    texts: Vec<String>,
    images: usize,
}

impl DrawingSurface for RecordingSurface {
    type Error = String;

    fn begin_page(&mut self, _width_mm: f32, _height_mm: f32) -> std::result::Result<(), String> {
        self.pages += 1;
        Ok(())
    }

    fn fill_rect(&mut self, _rect: &Rect, _color: Color) -> std::result::Result<(), String> {
        self.fills += 1;
        Ok(())
    }

    fn stroke_rect(&mut self, _rect: &Rect, _color: Color, _width: f32) -> std::result::Result<(), String> {
        self.strokes += 1;
        Ok(())
    }

    fn draw_text(&mut self, run: &TextRun) -> std::result::Result<(), String> {
        self.texts.push(run.text.clone());
        Ok(())
    }

    fn draw_image(&mut self, _image: &ImageAsset, _rect: &Rect, _opacity: u8) -> std::result::Result<(), String> {
        self.images += 1;
        Ok(())
    }
}

#[test]
fn test_plan_replays_onto_surface() {
    let mut project = project_with_name_label(3);
    project.add_text_region(Side::Back);

    let plan = project.plan_document(&ExportOptions::default()).unwrap();
    let mut surface = RecordingSurface::default();
    plan.render_to(&mut surface).unwrap();

    assert_eq!(surface.pages, 2);
    assert_eq!(surface.fills, 6);
    assert_eq!(surface.strokes, 6);
    assert_eq!(surface.texts.len(), 6);
    assert_eq!(surface.images, 0);
}
