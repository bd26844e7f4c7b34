// CoinGecko market-chart JSON parsing
use crate::model::{ParserError, PricePoint};
use crate::utils::datetime_from_millis;
use serde::Deserialize;

pub trait Parser {
    fn parse(&self, body: &str) -> Result<Vec<PricePoint>, ParserError>;
}

/// Body of `/coins/{id}/market_chart`. Only `prices` is consumed.
#[derive(Debug, Deserialize)]
struct MarketChartResponse {
    prices: Option<Vec<(f64, f64)>>,
}

pub struct MarketChartParser;

impl MarketChartParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for MarketChartParser {
    fn parse(&self, body: &str) -> Result<Vec<PricePoint>, ParserError> {
        let response: MarketChartResponse = serde_json::from_str(body)?;
        let prices = response
            .prices
            .ok_or_else(|| ParserError::MissingField("prices".into()))?;

        prices
            .into_iter()
            .map(|(timestamp, price)| {
                let millis = timestamp as i64;
                let date =
                    datetime_from_millis(millis).ok_or(ParserError::InvalidTimestamp(millis))?;
                Ok(PricePoint { date, price })
            })
            .collect()
    }
}
