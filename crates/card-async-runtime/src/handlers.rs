use crate::{CardUpdate, DecodeTicket, DocumentPlan};
use std::path::PathBuf;
use tokio::sync::mpsc;

pub async fn handle_decode_image(
    ticket: DecodeTicket,
    bytes: Vec<u8>,
    update_tx: &mpsc::UnboundedSender<CardUpdate>,
) {
    let result = card_layout::decode_image(bytes)
        .await
        .map_err(|e| e.to_string());
    if let Err(message) = &result {
        log::warn!("Decode #{} failed: {}", ticket.sequence, message);
    }
    let _ = update_tx.send(CardUpdate::ImageDecoded { ticket, result });
}

pub async fn handle_load_csv(input_path: PathBuf, update_tx: &mpsc::UnboundedSender<CardUpdate>) {
    match card_layout::load_text_rows_from_csv(&input_path).await {
        Ok(rows) => {
            let _ = update_tx.send(CardUpdate::CsvLoaded { rows });
        }
        Err(e) => {
            let _ = update_tx.send(CardUpdate::Error {
                message: format!("Failed to load CSV: {e}"),
            });
        }
    }
}

pub async fn handle_load_options(path: PathBuf, update_tx: &mpsc::UnboundedSender<CardUpdate>) {
    match card_layout::ExportOptions::load(&path).await {
        Ok(options) => {
            let _ = update_tx.send(CardUpdate::OptionsLoaded { options });
        }
        Err(e) => {
            let _ = update_tx.send(CardUpdate::Error {
                message: format!("Failed to load export options: {e}"),
            });
        }
    }
}

pub async fn handle_export(
    plan: DocumentPlan,
    output_path: PathBuf,
    update_tx: &mpsc::UnboundedSender<CardUpdate>,
) {
    match card_pdf::generate_pdf(&plan, &output_path).await {
        Ok(()) => {
            let _ = update_tx.send(CardUpdate::ExportComplete {
                path: output_path,
                card_count: plan.card_count(),
            });
        }
        Err(e) => {
            let _ = update_tx.send(CardUpdate::Error {
                message: format!("Failed to generate PDF: {e}"),
            });
        }
    }
}
