use crate::types::Result;
use std::path::Path;

/// Load per-card text values from a CSV file.
///
/// The first row is a header and is skipped. Each following row becomes one
/// card's values, in column order. Rows may have differing lengths.
pub async fn load_text_rows_from_csv(path: impl AsRef<Path>) -> Result<Vec<Vec<String>>> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let rows = tokio::task::spawn_blocking(move || {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(contents.as_bytes());
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok::<_, crate::types::LayoutError>(rows)
    })
    .await??;

    log::debug!("Loaded {} content rows from {}", rows.len(), path.display());
    Ok(rows)
}
