use crate::model::{FetchError, PriceTable};

#[async_trait::async_trait]
pub trait PriceFetcher: Send + Sync {
    /// Human-readable asset name, used in progress lines and chart titles.
    fn asset_name(&self) -> &str;

    async fn fetch(&self, days: u32) -> Result<PriceTable, FetchError>;
}
