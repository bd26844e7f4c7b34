use crate::analyzer::market_indicators::{
    max_defined, mean_defined, min_defined, pct_change, rolling_mean, rolling_std,
};
use crate::model::{AnalyzedTable, MarketStats, PriceTable};

pub const SHORT_WINDOW: usize = 7;
pub const LONG_WINDOW: usize = 14;
pub const VOLATILITY_WINDOW: usize = 7;

/// Trait defining the interface for a price-series analyzer.
pub trait Analyzer {
    /// Adds the derived columns. Rows and their order are left untouched.
    fn analyze(&self, table: PriceTable) -> AnalyzedTable;
    fn calculate_stats(&self, table: &AnalyzedTable) -> MarketStats;
}

/// Implementation of the price analyzer.
pub struct AnalyzerImpl;

impl AnalyzerImpl {
    pub fn new() -> Self {
        Self
    }
}

impl Analyzer for AnalyzerImpl {
    fn analyze(&self, table: PriceTable) -> AnalyzedTable {
        let prices = table.prices();

        AnalyzedTable {
            moving_avg_7: rolling_mean(&prices, SHORT_WINDOW),
            moving_avg_14: rolling_mean(&prices, LONG_WINDOW),
            volatility: rolling_std(&prices, VOLATILITY_WINDOW),
            price_change: pct_change(&prices),
            rows: table.into_rows(),
        }
    }

    /// Summarizes the analyzed table. Means over derived columns skip
    /// undefined entries. Expects at least one row.
    fn calculate_stats(&self, table: &AnalyzedTable) -> MarketStats {
        let count = table.len() as f64;
        let first_price = table.rows.first().map(|r| r.price).unwrap_or_default();
        let current_price = table.rows.last().map(|r| r.price).unwrap_or_default();

        MarketStats {
            min_price: table.prices().fold(f64::INFINITY, f64::min),
            max_price: table.prices().fold(f64::NEG_INFINITY, f64::max),
            avg_price: table.prices().sum::<f64>() / count,
            first_price,
            current_price,
            avg_volatility: mean_defined(&table.volatility),
            avg_change: mean_defined(&table.price_change),
            max_gain: max_defined(&table.price_change),
            max_loss: min_defined(&table.price_change),
            total_return: total_return(first_price, current_price),
        }
    }
}

/// Return over the period in percent: `(last / first - 1) * 100`.
pub fn total_return(first: f64, last: f64) -> f64 {
    (last / first - 1.0) * 100.0
}
