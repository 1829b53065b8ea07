use card_layout::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("Image embedding error: {0}")]
    Image(String),
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, PdfError>;
