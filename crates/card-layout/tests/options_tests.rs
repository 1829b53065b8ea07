use card_layout::*;

#[test]
fn test_default_options() {
    let options = ExportOptions::default();
    assert_eq!(options.paper_size, PaperSize::A4);
    assert_eq!(options.orientation, Orientation::Portrait);
    assert_eq!(options.margin_mm, 10.0);
    assert!(options.file_name.is_none());
    assert!(options.validate().is_ok());
}

#[test]
fn test_validation() {
    let mut options = ExportOptions::default();

    options.margin_mm = -1.0;
    assert!(options.validate().is_err());

    options.margin_mm = 0.0;
    assert!(options.validate().is_ok());

    options.paper_size = PaperSize::Custom {
        width_mm: 0.0,
        height_mm: 100.0,
    };
    match options.validate() {
        Err(LayoutError::Config(msg)) => assert!(msg.contains("Page size")),
        other => panic!("Expected Config error, got {:?}", other),
    }

    options.paper_size = PaperSize::A5;
    options.file_name = Some("   ".to_string());
    assert!(options.validate().is_err());
}

#[test]
fn test_validation_rejects_non_finite_values() {
    for margin in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
        let options = ExportOptions {
            margin_mm: margin,
            ..Default::default()
        };
        match options.validate() {
            Err(LayoutError::Config(msg)) => assert!(msg.contains("Margin")),
            other => panic!("Expected Config error for {}, got {:?}", margin, other),
        }
    }

    for (width_mm, height_mm) in [(f32::NAN, 297.0), (210.0, f32::INFINITY)] {
        let options = ExportOptions {
            paper_size: PaperSize::Custom {
                width_mm,
                height_mm,
            },
            ..Default::default()
        };
        match options.validate() {
            Err(LayoutError::Config(msg)) => assert!(msg.contains("Page size")),
            other => panic!("Expected Config error, got {:?}", other),
        }
    }
}

#[test]
fn test_non_finite_margin_blocks_export() {
    let project = CardProject::new();
    let options = ExportOptions {
        margin_mm: f32::NAN,
        ..Default::default()
    };
    assert!(matches!(
        project.plan_document(&options),
        Err(LayoutError::Config(_))
    ));
}

#[test]
fn test_card_size_for_grid() {
    let options = ExportOptions::default();
    let (width, height) = options.card_size_mm(Grid::new(2, 4).unwrap());
    assert_eq!(width, 95.0);
    assert_eq!(height, 69.25);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_save_and_load_options() {
    use tempfile::NamedTempFile;

    let options = ExportOptions {
        paper_size: PaperSize::Letter,
        orientation: Orientation::Landscape,
        margin_mm: 6.5,
        file_name: Some("deck.pdf".to_string()),
    };

    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    options.save(path).await.unwrap();
    let loaded = ExportOptions::load(path).await.unwrap();

    assert_eq!(loaded, options);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_fills_missing_fields_with_defaults() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), r#"{ "margin_mm": 4.0 }"#).unwrap();

    let loaded = ExportOptions::load(temp_file.path()).await.unwrap();
    assert_eq!(loaded.margin_mm, 4.0);
    assert_eq!(loaded.paper_size, PaperSize::A4);
}

#[cfg(feature = "serde")]
#[tokio::test]
async fn test_load_rejects_malformed_json() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "not json").unwrap();

    assert!(matches!(
        ExportOptions::load(temp_file.path()).await,
        Err(LayoutError::Config(_))
    ));
}
