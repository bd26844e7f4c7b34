mod analyzer;
mod config;
mod fetcher;
mod model;
mod normalizer;
mod parser;
mod pipeline;
mod renderer;
mod utils;

use analyzer::AnalyzerImpl;
use config::load_config;
use fetcher::{CoinGeckoFetcher, PriceFetcher};
use pipeline::RunOutcome;
use renderer::SvgChartRenderer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let fetcher = match CoinGeckoFetcher::new(&config) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return;
        }
    };
    let analyzer = AnalyzerImpl::new();
    let title = format!("{} Market Analysis ({} Days)", fetcher.asset_name(), config.days);
    let renderer = SvgChartRenderer::new(
        config.output_path.clone(),
        (config.chart_width, config.chart_height),
        title,
    )
    .with_viewer(config.show_chart);

    info!("Requesting {} days of history", config.days);
    let mut stdout = std::io::stdout();
    match pipeline::run(&fetcher, &analyzer, &renderer, config.days, &mut stdout).await {
        Ok(RunOutcome::Completed(_)) => info!("Done."),
        Ok(RunOutcome::FetchFailed) => info!("Stopped after failed fetch."),
        Err(e) => error!("Run aborted: {}", e),
    }
}
