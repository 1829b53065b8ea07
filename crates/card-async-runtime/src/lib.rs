use std::path::PathBuf;

mod handlers;
mod worker;

// Re-export types from library crates
pub use card_layout::{
    CardProject, DecodeTarget, DecodeTicket, DocumentPlan, ExportOptions, ImageAsset, LayoutError,
};
pub use worker::worker_task;

/// Commands sent from the editor to the worker
#[derive(Debug)]
pub enum CardCommand {
    /// Decode uploaded image bytes. Decodes run concurrently and may finish
    /// in any order; the ticket tells the editor whether a result is stale.
    DecodeImage { ticket: DecodeTicket, bytes: Vec<u8> },
    LoadCsv { input_path: PathBuf },
    LoadOptions { path: PathBuf },
    Export {
        plan: DocumentPlan,
        output_path: PathBuf,
    },
}

/// Updates sent from the worker to the editor
#[derive(Debug, Clone)]
pub enum CardUpdate {
    ImageDecoded {
        ticket: DecodeTicket,
        result: Result<ImageAsset, String>,
    },
    CsvLoaded {
        rows: Vec<Vec<String>>,
    },
    OptionsLoaded {
        options: ExportOptions,
    },
    ExportComplete {
        path: PathBuf,
        card_count: usize,
    },
    Error {
        message: String,
    },
}

/// Apply a decode result received from the worker.
///
/// Returns `Ok(false)` when the result was superseded by a newer load.
pub fn apply_decoded(
    project: &mut CardProject,
    ticket: DecodeTicket,
    result: Result<ImageAsset, String>,
) -> card_layout::Result<bool> {
    project.complete_image_load(ticket, result.map_err(LayoutError::Decode))
}
