mod pdf;
mod surface;
mod types;

pub use pdf::{generate_pdf, generate_pdf_bytes};
pub use surface::PdfSurface;
pub use types::*;
