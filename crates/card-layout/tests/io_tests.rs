use card_layout::*;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

#[tokio::test]
async fn test_decode_png() {
    let bytes = png_bytes(30, 20);
    let asset = decode_image(bytes.clone()).await.unwrap();

    assert_eq!(asset.width(), 30);
    assert_eq!(asset.height(), 20);
    assert_eq!(asset.data(), bytes.as_slice());
    assert_eq!(asset.aspect_ratio(), Some(1.5));
}

#[tokio::test]
async fn test_decode_garbage_fails() {
    let result = decode_image(b"definitely not an image".to_vec()).await;
    assert!(matches!(result, Err(LayoutError::Decode(_))));
}

#[tokio::test]
async fn test_load_template_image_snaps_height() {
    let mut project = CardProject::new();
    project.add_image_region(Side::Front);

    let target = DecodeTarget::TemplateImage {
        side: Side::Front,
        index: 0,
    };
    assert!(project.load_image(target, png_bytes(40, 10)).await.unwrap());

    let region = project.template().image_region(Side::Front, 0).unwrap();
    assert_eq!(region.original_aspect_ratio, Some(4.0));
    assert_eq!(region.geometry.height, 15.0);
    assert_eq!(region.image.as_ref().map(ImageAsset::width), Some(40));
}

#[tokio::test]
async fn test_failed_load_keeps_previous_image() {
    let mut project = CardProject::new();
    project.add_image_region(Side::Front);
    let target = DecodeTarget::CardImage {
        card: 2,
        side: Side::Front,
        index: 0,
    };

    project.load_image(target, png_bytes(8, 8)).await.unwrap();
    let before = project.contents().clone();

    let result = project.load_image(target, vec![0u8; 16]).await;
    assert!(result.is_err());
    assert_eq!(project.contents(), &before);
}

#[tokio::test]
async fn test_load_csv_rows() {
    use tempfile::NamedTempFile;

    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(
        temp_file.path(),
        "name,title,answer\nAlice,Engineer,42\nBob,Designer\n\"Smith, Jane\",Lead,7\n",
    )
    .unwrap();

    let rows = load_text_rows_from_csv(temp_file.path()).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], vec!["Alice", "Engineer", "42"]);
    assert_eq!(rows[1], vec!["Bob", "Designer"]);
    assert_eq!(rows[2][0], "Smith, Jane");

    let mut project = CardProject::new();
    project.set_actual_card_count(2).unwrap();
    project.add_text_region(Side::Front);
    project.add_text_region(Side::Back);
    assert_eq!(project.apply_text_rows(&rows), 2);

    let cards = project.contents().cards();
    assert_eq!(cards[0].front.text_values, vec!["Alice"]);
    assert_eq!(cards[0].back.text_values, vec!["Engineer"]);
    assert_eq!(cards[1].back.text_values, vec!["Designer"]);
}

#[tokio::test]
async fn test_load_csv_missing_file() {
    let result = load_text_rows_from_csv("/nonexistent/cards.csv").await;
    assert!(matches!(result, Err(LayoutError::Io(_))));
}
