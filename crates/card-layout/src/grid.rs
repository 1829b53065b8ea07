//! Grid dimensions and the project-level card count
//!
//! Slots are numbered row-major: slot `i` sits at row `i / columns`,
//! column `i % columns`.

use crate::constants::{DEFAULT_COLUMNS, DEFAULT_PROJECT_NAME, DEFAULT_ROWS};
use crate::types::{LayoutError, Result};

/// Columns × rows of cards on one page. Both are always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "GridDimensions")
)]
pub struct Grid {
    columns: usize,
    rows: usize,
}

#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct GridDimensions {
    columns: usize,
    rows: usize,
}

#[cfg(feature = "serde")]
impl TryFrom<GridDimensions> for Grid {
    type Error = LayoutError;

    fn try_from(dims: GridDimensions) -> Result<Self> {
        Grid::new(dims.columns, dims.rows)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
        }
    }
}

impl Grid {
    pub fn new(columns: usize, rows: usize) -> Result<Self> {
        if columns == 0 || rows == 0 {
            return Err(LayoutError::InvalidGrid { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of slots in the grid
    pub fn max_slots(&self) -> usize {
        self.columns * self.rows
    }

    /// Row-major position of a slot
    pub fn position(&self, slot: usize) -> GridPosition {
        GridPosition::new(slot / self.columns, slot % self.columns)
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Project name, grid, and how many of the grid's slots hold cards.
///
/// Invariant: `1 <= actual_card_count <= grid.max_slots()`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectConfig {
    pub name: String,
    grid: Grid,
    actual_card_count: usize,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let grid = Grid::default();
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            grid,
            actual_card_count: grid.max_slots(),
        }
    }
}

impl ProjectConfig {
    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn max_slots(&self) -> usize {
        self.grid.max_slots()
    }

    pub fn actual_card_count(&self) -> usize {
        self.actual_card_count
    }

    /// Change the grid. The card count is clamped down to the new capacity
    /// but never grown.
    pub fn set_grid(&mut self, columns: usize, rows: usize) -> Result<()> {
        self.grid = Grid::new(columns, rows)?;
        let max = self.grid.max_slots();
        if self.actual_card_count > max {
            log::debug!(
                "Clamping card count {} to new grid capacity {}",
                self.actual_card_count,
                max
            );
            self.actual_card_count = max;
        }
        Ok(())
    }

    /// Set how many slots hold cards. Values outside `1..=max_slots` are rejected.
    pub fn set_actual_card_count(&mut self, count: usize) -> Result<()> {
        let max = self.max_slots();
        if count == 0 || count > max {
            return Err(LayoutError::CardCountOutOfRange {
                requested: count,
                max,
            });
        }
        self.actual_card_count = count;
        Ok(())
    }

    /// PDF file name: every non-alphanumeric character becomes `_`
    pub fn pdf_file_name(&self) -> String {
        sanitize_file_stem(&self.name) + ".pdf"
    }
}

/// Replace every character outside `[A-Za-z0-9]` with `_`
pub fn sanitize_file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProjectConfig::default();
        assert_eq!(config.name, "default");
        assert_eq!(config.grid(), Grid { columns: 3, rows: 3 });
        assert_eq!(config.max_slots(), 9);
        assert_eq!(config.actual_card_count(), 9);
    }

    #[test]
    fn test_set_grid_clamps_down_only() {
        let mut config = ProjectConfig::default();
        config.set_grid(2, 2).unwrap();
        assert_eq!(config.max_slots(), 4);
        assert_eq!(config.actual_card_count(), 4);

        config.set_grid(4, 4).unwrap();
        assert_eq!(config.max_slots(), 16);
        assert_eq!(config.actual_card_count(), 4);
    }

    #[test]
    fn test_set_grid_rejects_zero() {
        let mut config = ProjectConfig::default();
        assert!(matches!(
            config.set_grid(0, 3),
            Err(LayoutError::InvalidGrid { columns: 0, rows: 3 })
        ));
        assert_eq!(config.grid(), Grid::default());
    }

    #[test]
    fn test_grid_properties_for_all_small_grids() {
        for columns in 1..=6 {
            for rows in 1..=6 {
                let mut config = ProjectConfig::default();
                config.set_grid(columns, rows).unwrap();
                assert_eq!(config.max_slots(), columns * rows);
                assert!(config.actual_card_count() >= 1);
                assert!(config.actual_card_count() <= config.max_slots());
            }
        }
    }

    #[test]
    fn test_set_actual_card_count_bounds() {
        let mut config = ProjectConfig::default();
        config.set_actual_card_count(5).unwrap();
        assert_eq!(config.actual_card_count(), 5);

        assert!(config.set_actual_card_count(0).is_err());
        assert!(config.set_actual_card_count(10).is_err());
        assert_eq!(config.actual_card_count(), 5);
    }

    #[test]
    fn test_grid_new_validates_dimensions() {
        assert!(matches!(
            Grid::new(0, 2),
            Err(LayoutError::InvalidGrid { columns: 0, rows: 2 })
        ));
        assert!(Grid::new(2, 0).is_err());

        let grid = Grid::new(4, 2).unwrap();
        assert_eq!((grid.columns(), grid.rows()), (4, 2));
        assert_eq!(grid.max_slots(), 8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_grid_deserialize_rejects_zero() {
        let grid: Grid = serde_json::from_str(r#"{"columns":2,"rows":5}"#).unwrap();
        assert_eq!(grid, Grid::new(2, 5).unwrap());
        assert!(serde_json::from_str::<Grid>(r#"{"columns":0,"rows":5}"#).is_err());
    }

    #[test]
    fn test_row_major_positions() {
        let grid = Grid::new(3, 2).unwrap();
        assert_eq!(grid.position(0), GridPosition::new(0, 0));
        assert_eq!(grid.position(2), GridPosition::new(0, 2));
        assert_eq!(grid.position(3), GridPosition::new(1, 0));
        assert_eq!(grid.position(5), GridPosition::new(1, 2));
    }

    #[test]
    fn test_pdf_file_name() {
        let mut config = ProjectConfig::default();
        config.name = "My Cards: v2!".to_string();
        assert_eq!(config.pdf_file_name(), "My_Cards__v2_.pdf");

        config.name = "Meine Käse".to_string();
        assert_eq!(config.pdf_file_name(), "Meine_K_se.pdf");
    }
}
