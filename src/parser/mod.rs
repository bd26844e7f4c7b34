// Response parsing for the market-chart endpoint.

pub mod market_chart;

pub use market_chart::{MarketChartParser, Parser};
