use crate::config::AppConfig;
use crate::fetcher::traits::PriceFetcher;
use crate::model::{FetchError, PriceTable};
use crate::parser::{MarketChartParser, Parser};

use reqwest::Client;
use tracing::debug;

pub const COIN_ID: &str = "bitcoin";
pub const COIN_NAME: &str = "Bitcoin";
pub const VS_CURRENCY: &str = "usd";

pub struct CoinGeckoFetcher {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    parser: MarketChartParser,
}

impl CoinGeckoFetcher {
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("coin-pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            parser: MarketChartParser::new(),
        })
    }

    fn build_url(&self, days: u32) -> String {
        format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}&interval=daily",
            self.base_url, COIN_ID, VS_CURRENCY, days
        )
    }
}

#[async_trait::async_trait]
impl PriceFetcher for CoinGeckoFetcher {
    fn asset_name(&self) -> &str {
        COIN_NAME
    }

    async fn fetch(&self, days: u32) -> Result<PriceTable, FetchError> {
        let url = self.build_url(days);
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await?;
        let points = self.parser.parse(&body)?;
        debug!("Parsed {} raw price points", points.len());

        let table = PriceTable::from_points(points);
        if table.is_empty() {
            return Err(FetchError::Empty);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use crate::model::ParserError;
    use tokio::net::TcpListener;

    /// Serves one canned HTTP response on a local port and returns its base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
        });
        format!("http://{}", addr)
    }

    async fn fetch_from(base_url: String) -> Result<PriceTable, FetchError> {
        let config = AppConfig {
            api_base_url: base_url,
            ..AppConfig::default()
        };
        CoinGeckoFetcher::new(&config).unwrap().fetch(30).await
    }

    #[test]
    fn url_requests_daily_usd_prices() {
        let config = AppConfig {
            api_base_url: "http://localhost:8080/api/v3/".into(),
            ..AppConfig::default()
        };
        let fetcher = CoinGeckoFetcher::new(&config).unwrap();

        assert_eq!(
            fetcher.build_url(30),
            "http://localhost:8080/api/v3/coins/bitcoin/market_chart?vs_currency=usd&days=30&interval=daily"
        );
        assert_eq!(fetcher.asset_name(), "Bitcoin");
    }

    #[tokio::test]
    async fn unreachable_host_is_reported() {
        let config = AppConfig {
            api_base_url: "http://127.0.0.1:1".into(),
            ..AppConfig::default()
        };
        let fetcher = CoinGeckoFetcher::new(&config).unwrap();

        let err = fetcher.fetch(30).await.unwrap_err();
        assert!(matches!(err, FetchError::Http(_) | FetchError::Status(_)));
    }

    #[tokio::test]
    async fn served_prices_become_a_table() {
        let base = serve_once(
            "200 OK",
            r#"{"prices": [[1704153600000, 44187.14], [1704067200000, 42280.23]]}"#,
        )
        .await;

        let table = fetch_from(base).await.unwrap();

        assert_eq!(table.prices(), vec![42280.23, 44187.14]);
    }

    #[tokio::test]
    async fn empty_price_list_is_empty_error() {
        let base = serve_once("200 OK", r#"{"prices": []}"#).await;

        let err = fetch_from(base).await.unwrap_err();
        assert!(matches!(err, FetchError::Empty));
    }

    #[tokio::test]
    async fn rate_limited_response_is_status_error() {
        let base = serve_once("429 Too Many Requests", r#"{"status": {"error_code": 429}}"#).await;

        let err = fetch_from(base).await.unwrap_err();
        assert!(matches!(err, FetchError::Status(s) if s.as_u16() == 429));
    }

    #[tokio::test]
    async fn body_without_prices_is_parse_error() {
        let base = serve_once("200 OK", r#"{"market_caps": []}"#).await;

        let err = fetch_from(base).await.unwrap_err();
        assert!(matches!(err, FetchError::Parse(ParserError::MissingField(_))));
    }
}
