pub mod constants;
mod content;
mod csv_rows;
mod decode;
mod export;
mod geometry;
mod grid;
mod options;
mod render;
mod session;
mod stats;
mod template;
mod types;

pub use content::*;
pub use csv_rows::load_text_rows_from_csv;
pub use decode::*;
pub use export::*;
pub use geometry::*;
pub use grid::*;
pub use options::*;
pub use render::*;
pub use session::CardProject;
pub use stats::calculate_statistics;
pub use template::*;
pub use types::*;
