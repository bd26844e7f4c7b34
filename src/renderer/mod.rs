// Renderer module: chart output and text summaries.

pub mod chart;
pub mod summary;

use crate::model::{AnalyzedTable, MarketStats, RenderError};
use std::path::PathBuf;

pub use chart::SvgChartRenderer;

pub trait ChartRenderer {
    /// Draws the dashboard and returns the path of the written image.
    fn render(&self, table: &AnalyzedTable, stats: &MarketStats) -> Result<PathBuf, RenderError>;
}
