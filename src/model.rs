// Core structs: PricePoint, PriceTable, AnalyzedTable, MarketStats
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::normalizer::normalize_points;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: DateTime<Utc>,
    pub price: f64,
}

/// Date-indexed price series, sorted ascending with one row per date.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    rows: Vec<PricePoint>,
}

impl PriceTable {
    /// Builds a table from raw points, sorting them and collapsing duplicate dates.
    pub fn from_points(mut points: Vec<PricePoint>) -> Self {
        normalize_points(&mut points);
        Self { rows: points }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn prices(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.price).collect()
    }

    pub fn into_rows(self) -> Vec<PricePoint> {
        self.rows
    }
}

/// Price table augmented with the derived columns. Every column has one
/// entry per row; `None` marks the leading window without enough history.
#[derive(Debug, Clone)]
pub struct AnalyzedTable {
    pub rows: Vec<PricePoint>,
    pub moving_avg_7: Vec<Option<f64>>,
    pub moving_avg_14: Vec<Option<f64>>,
    pub volatility: Vec<Option<f64>>,
    pub price_change: Vec<Option<f64>>,
}

impl AnalyzedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn prices(&self) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(|r| r.price)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarketStats {
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub first_price: f64,
    pub current_price: f64,
    pub avg_volatility: Option<f64>,
    pub avg_change: Option<f64>,
    pub max_gain: Option<f64>,
    pub max_loss: Option<f64>,
    pub total_return: f64,
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("missing field: {0}")]
    MissingField(String),
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response status: {0}")]
    Status(reqwest::StatusCode),
    #[error("parse error: {0}")]
    Parse(#[from] ParserError),
    #[error("no price data returned")]
    Empty,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("drawing failed: {0}")]
    Draw(String),
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("console write failed: {0}")]
    Io(#[from] std::io::Error),
}
