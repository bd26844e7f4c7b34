//! 2x2 SVG dashboard: price with moving averages, volatility bars,
//! daily change bars and a summary text block.

use std::ops::Range;
use std::path::{Path, PathBuf};
use std::process::Command;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use tracing::{debug, info, warn};

use crate::model::{AnalyzedTable, MarketStats, RenderError};
use crate::renderer::summary::panel_lines;
use crate::renderer::ChartRenderer;
use crate::utils::format_day;

const ORANGE: RGBColor = RGBColor(255, 127, 14);
const GAIN: RGBColor = RGBColor(44, 160, 44);
const LOSS: RGBColor = RGBColor(214, 39, 40);

type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

pub struct SvgChartRenderer {
    output_path: PathBuf,
    size: (u32, u32),
    title: String,
    show: bool,
}

impl SvgChartRenderer {
    pub fn new(output_path: impl Into<PathBuf>, size: (u32, u32), title: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            size,
            title: title.into(),
            show: false,
        }
    }

    /// Open the written file in the platform image viewer after rendering.
    pub fn with_viewer(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Renders the dashboard into an in-memory SVG document.
    #[cfg(test)]
    fn render_to_string(
        &self,
        table: &AnalyzedTable,
        stats: &MarketStats,
    ) -> Result<String, RenderError> {
        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            draw_dashboard(&root, &self.title, table, stats).map_err(draw_error)?;
        }
        Ok(svg)
    }
}

impl ChartRenderer for SvgChartRenderer {
    fn render(&self, table: &AnalyzedTable, stats: &MarketStats) -> Result<PathBuf, RenderError> {
        {
            let root = SVGBackend::new(&self.output_path, self.size).into_drawing_area();
            draw_dashboard(&root, &self.title, table, stats).map_err(draw_error)?;
        }
        info!("Chart written to {}", self.output_path.display());

        if self.show {
            open_in_viewer(&self.output_path);
        }
        Ok(self.output_path.clone())
    }
}

fn draw_error<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> RenderError {
    RenderError::Draw(e.to_string())
}

fn draw_dashboard<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    table: &AnalyzedTable,
    stats: &MarketStats,
) -> DrawResult<DB> {
    root.fill(&WHITE)?;
    let body = root.titled(title, ("sans-serif", 32).into_font().style(FontStyle::Bold))?;
    let panels = body.split_evenly((2, 2));
    let labels: Vec<String> = table.rows.iter().map(|r| format_day(&r.date)).collect();

    draw_price_panel(&panels[0], table, &labels)?;
    draw_bar_panel(
        &panels[1],
        "Price Volatility (7-day std dev)",
        "Volatility",
        &table.volatility,
        &labels,
        |_| ORANGE.mix(0.7),
    )?;
    draw_bar_panel(
        &panels[2],
        "Daily Price Change %",
        "Change %",
        &table.price_change,
        &labels,
        |v| change_color(v).mix(0.6),
    )?;
    draw_summary_panel(&panels[3], stats)?;

    root.present()
}

fn draw_price_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &AnalyzedTable,
    labels: &[String],
) -> DrawResult<DB> {
    let prices: Vec<(f64, f64)> = table
        .prices()
        .enumerate()
        .map(|(i, p)| (i as f64, p))
        .collect();
    let y_range = value_range(prices.iter().map(|&(_, p)| p), false);

    let mut chart = ChartBuilder::on(area)
        .caption("Price & Moving Averages", ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range(table.len()), y_range)?;

    let day_label = |x: &f64| label_at(labels, *x);
    chart
        .configure_mesh()
        .x_labels(6)
        .x_label_formatter(&day_label)
        .y_desc("Price (USD)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(prices, BLUE.stroke_width(2)))?
        .label("Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    for (name, column, color) in [
        ("7-day MA", &table.moving_avg_7, ORANGE),
        ("14-day MA", &table.moving_avg_14, GAIN),
    ] {
        chart
            .draw_series(LineSeries::new(defined_points(column), color.stroke_width(1)))?
            .label(name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(1)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

fn draw_bar_panel<DB, F>(
    area: &DrawingArea<DB, Shift>,
    caption: &str,
    y_desc: &str,
    column: &[Option<f64>],
    labels: &[String],
    color_of: F,
) -> DrawResult<DB>
where
    DB: DrawingBackend,
    F: Fn(f64) -> RGBAColor,
{
    let y_range = value_range(column.iter().flatten().copied(), true);

    let mut chart = ChartBuilder::on(area)
        .caption(caption, ("sans-serif", 22))
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range(column.len()), y_range)?;

    let day_label = |x: &f64| label_at(labels, *x);
    chart
        .configure_mesh()
        .x_labels(6)
        .x_label_formatter(&day_label)
        .y_desc(y_desc)
        .draw()?;

    chart.draw_series(defined_points(column).into_iter().map(|(x, v)| {
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, v)], color_of(v).filled())
    }))?;
    Ok(())
}

fn draw_summary_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    stats: &MarketStats,
) -> DrawResult<DB> {
    let style: TextStyle = ("monospace", 20).into_font().into();
    let lines = panel_lines(stats);
    let (width, height) = area.dim_in_pixel();
    let line_height = 30;
    let top = (height as i32 - line_height * lines.len() as i32) / 2;

    for (i, line) in lines.iter().enumerate() {
        let pos = (width as i32 / 10, top + i as i32 * line_height);
        area.draw(&Text::new(line.as_str(), pos, style.clone()))?;
    }
    Ok(())
}

/// Bar color for a daily change: red below zero, green otherwise.
fn change_color(value: f64) -> RGBColor {
    if value < 0.0 { LOSS } else { GAIN }
}

fn defined_points(column: &[Option<f64>]) -> Vec<(f64, f64)> {
    column
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect()
}

fn x_range(len: usize) -> Range<f64> {
    -0.5..(len.max(1) as f64 - 0.5)
}

/// Padded y-axis bounds. All-undefined columns get a unit range.
fn value_range(values: impl Iterator<Item = f64>, include_zero: bool) -> Range<f64> {
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let pad = if hi > lo {
        (hi - lo) * 0.05
    } else {
        lo.abs().max(1.0) * 0.05
    };
    (lo - pad)..(hi + pad)
}

fn label_at(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if rounded < 0.0 || (x - rounded).abs() > 1e-6 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

fn open_in_viewer(path: &Path) {
    #[cfg(target_os = "macos")]
    let mut command = Command::new("open");
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = Command::new("xdg-open");

    // The viewer outlives us; its handle is not waited on.
    match command.arg(path).spawn() {
        Ok(_child) => debug!("Opened {} in viewer", path.display()),
        Err(e) => warn!("Could not open {}: {}", path.display(), e),
    }
}
