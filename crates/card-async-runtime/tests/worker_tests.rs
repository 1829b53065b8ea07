use card_async_runtime::*;
use card_layout::Side;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::time::Duration;
use tokio::sync::mpsc;

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

fn spawn_worker() -> (
    mpsc::UnboundedSender<CardCommand>,
    mpsc::UnboundedReceiver<CardUpdate>,
) {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    tokio::spawn(worker_task(command_rx, update_tx));
    (command_tx, update_rx)
}

async fn next_update(update_rx: &mut mpsc::UnboundedReceiver<CardUpdate>) -> CardUpdate {
    tokio::time::timeout(Duration::from_secs(10), update_rx.recv())
        .await
        .expect("worker timed out")
        .expect("worker hung up")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_only_latest_decode_is_applied() {
    let (command_tx, mut update_rx) = spawn_worker();

    let mut project = CardProject::new();
    project.add_image_region(Side::Front);
    let target = DecodeTarget::CardImage {
        card: 0,
        side: Side::Front,
        index: 0,
    };

    let first = project.begin_image_load(target);
    let second = project.begin_image_load(target);

    // The older upload is larger, so it tends to finish last
    command_tx
        .send(CardCommand::DecodeImage {
            ticket: first,
            bytes: png_bytes(600, 400),
        })
        .unwrap();
    command_tx
        .send(CardCommand::DecodeImage {
            ticket: second,
            bytes: png_bytes(2, 2),
        })
        .unwrap();

    let mut applied = 0;
    for _ in 0..2 {
        match next_update(&mut update_rx).await {
            CardUpdate::ImageDecoded { ticket, result } => {
                if apply_decoded(&mut project, ticket, result).unwrap() {
                    applied += 1;
                    assert_eq!(ticket, second);
                }
            }
            other => panic!("Unexpected update {:?}", other),
        }
    }

    // Whatever the completion order, only the newer image survives
    let image = project.contents().cards()[0].front.image_values[0]
        .as_ref()
        .unwrap();
    assert_eq!((image.width(), image.height()), (2, 2));
    assert_eq!(applied, 1);
    assert_eq!(project.pending_image_loads(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failed_decode_reports_error() {
    let (command_tx, mut update_rx) = spawn_worker();

    let mut project = CardProject::new();
    let ticket = project.begin_image_load(DecodeTarget::Background { side: Side::Front });
    command_tx
        .send(CardCommand::DecodeImage {
            ticket,
            bytes: b"nope".to_vec(),
        })
        .unwrap();

    match next_update(&mut update_rx).await {
        CardUpdate::ImageDecoded { result, .. } => {
            assert!(result.is_err());
            assert!(matches!(
                apply_decoded(&mut project, ticket, result),
                Err(LayoutError::Decode(_))
            ));
            assert!(project.template().front.background_image.is_none());
        }
        other => panic!("Unexpected update {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_export_writes_pdf() {
    let (command_tx, mut update_rx) = spawn_worker();
    let dir = tempfile::tempdir().unwrap();

    let mut project = CardProject::new();
    project.set_actual_card_count(5).unwrap();
    project.add_text_region(Side::Front);
    let plan = project.plan_document(&ExportOptions::default()).unwrap();
    let output_path = dir.path().join(&plan.file_name);

    command_tx
        .send(CardCommand::Export {
            plan,
            output_path: output_path.clone(),
        })
        .unwrap();

    match next_update(&mut update_rx).await {
        CardUpdate::ExportComplete { path, card_count } => {
            assert_eq!(path, output_path);
            assert_eq!(card_count, 5);
            assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
        }
        other => panic!("Unexpected update {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_load_csv_and_missing_file() {
    let (command_tx, mut update_rx) = spawn_worker();
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("cards.csv");
    std::fs::write(&csv_path, "front,back\nhund,dog\nkatze,cat\n").unwrap();

    command_tx
        .send(CardCommand::LoadCsv {
            input_path: csv_path,
        })
        .unwrap();
    match next_update(&mut update_rx).await {
        CardUpdate::CsvLoaded { rows } => {
            assert_eq!(rows, vec![vec!["hund", "dog"], vec!["katze", "cat"]]);
        }
        other => panic!("Unexpected update {:?}", other),
    }

    command_tx
        .send(CardCommand::LoadCsv {
            input_path: dir.path().join("missing.csv"),
        })
        .unwrap();
    match next_update(&mut update_rx).await {
        CardUpdate::Error { message } => assert!(message.contains("Failed to load CSV")),
        other => panic!("Unexpected update {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_load_options() {
    let (command_tx, mut update_rx) = spawn_worker();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("export.json");

    let options = ExportOptions {
        margin_mm: 5.0,
        ..Default::default()
    };
    options.save(&path).await.unwrap();

    command_tx.send(CardCommand::LoadOptions { path }).unwrap();
    match next_update(&mut update_rx).await {
        CardUpdate::OptionsLoaded { options: loaded } => assert_eq!(loaded, options),
        other => panic!("Unexpected update {:?}", other),
    }
}
