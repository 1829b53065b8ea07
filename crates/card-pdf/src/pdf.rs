use crate::surface::PdfSurface;
use crate::types::Result;
use card_layout::DocumentPlan;
use std::path::Path;

pub async fn generate_pdf(plan: &DocumentPlan, output_path: impl AsRef<Path>) -> Result<()> {
    let plan = plan.clone();
    let output_path = output_path.as_ref().to_owned();

    // PDF generation is CPU-bound, spawn blocking
    let bytes = tokio::task::spawn_blocking(move || generate_pdf_bytes(&plan)).await??;

    tokio::fs::write(&output_path, bytes).await?;
    log::info!("Wrote {}", output_path.display());

    Ok(())
}

/// Serialize a planned document to PDF bytes
pub fn generate_pdf_bytes(plan: &DocumentPlan) -> Result<Vec<u8>> {
    let mut surface = PdfSurface::new(&plan.title);
    plan.render_to(&mut surface)?;

    log::debug!(
        "Rendered {} card(s) on {} page(s)",
        plan.card_count(),
        surface.page_count()
    );

    Ok(surface.finish())
}
