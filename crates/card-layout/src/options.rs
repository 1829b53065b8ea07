use crate::constants::DEFAULT_MARGIN_MM;
use crate::geometry::card_size_mm;
use crate::grid::Grid;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Page setup for the exported document
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ExportOptions {
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    /// Uniform page margin around the card grid
    pub margin_mm: f32,
    /// Output file name; derived from the project name when unset
    pub file_name: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Portrait,
            margin_mm: DEFAULT_MARGIN_MM,
            file_name: None,
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Page width and height with orientation applied
    pub fn page_dimensions_mm(&self) -> (f32, f32) {
        self.paper_size.dimensions_with_orientation(self.orientation)
    }

    /// Physical size of one card for the given grid
    pub fn card_size_mm(&self, grid: Grid) -> (f32, f32) {
        let (page_width, page_height) = self.page_dimensions_mm();
        card_size_mm(page_width, page_height, self.margin_mm, grid.columns(), grid.rows())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let (width, height) = self.page_dimensions_mm();
        if !width.is_finite() || !height.is_finite() {
            return Err(LayoutError::Config(format!(
                "Page size must be a finite number, got {}x{} mm",
                width, height
            )));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(LayoutError::Config(format!(
                "Page size must be positive, got {}x{} mm",
                width, height
            )));
        }

        if !self.margin_mm.is_finite() {
            return Err(LayoutError::Config(format!(
                "Margin must be a finite number, got {}",
                self.margin_mm
            )));
        }
        if self.margin_mm < 0.0 {
            return Err(LayoutError::Config("Margin cannot be negative".to_string()));
        }

        if 2.0 * self.margin_mm >= width.min(height) {
            return Err(LayoutError::Config(format!(
                "Margin of {} mm leaves no printable area on a {}x{} mm page",
                self.margin_mm, width, height
            )));
        }

        if let Some(name) = &self.file_name {
            if name.trim().is_empty() {
                return Err(LayoutError::Config("File name cannot be empty".to_string()));
            }
        }

        Ok(())
    }
}
