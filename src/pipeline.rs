use crate::analyzer::Analyzer;
use crate::analyzer::price_analysis::LONG_WINDOW;
use crate::fetcher::PriceFetcher;
use crate::model::{MarketStats, PipelineError, PriceTable};
use crate::renderer::ChartRenderer;
use crate::renderer::summary::console_lines;
use std::io::Write;
use tracing::{error, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Completed(MarketStats),
    FetchFailed,
}

/// Runs one fetch -> analyze -> render -> report pass, writing progress and
/// the final summary to `out`. A failed fetch stops the run without touching
/// the analyzer or the renderer.
pub async fn run<F, A, R, W>(
    fetcher: &F,
    analyzer: &A,
    renderer: &R,
    days: u32,
    out: &mut W,
) -> Result<RunOutcome, PipelineError>
where
    F: PriceFetcher,
    A: Analyzer,
    R: ChartRenderer,
    W: Write,
{
    writeln!(out, "🔍 Fetching {} data...", fetcher.asset_name())?;
    let Some(table) = fetch_prices(fetcher, days, out).await? else {
        writeln!(out, "❌ Failed to fetch data")?;
        return Ok(RunOutcome::FetchFailed);
    };
    writeln!(out, "✓ Loaded {} days of data", table.len())?;
    if table.len() < LONG_WINDOW {
        warn!(
            "Only {} rows of history; rolling statistics will be partly or fully undefined",
            table.len()
        );
    }

    writeln!(out, "📊 Analyzing data...")?;
    let analyzed = analyzer.analyze(table);
    let stats = analyzer.calculate_stats(&analyzed);

    writeln!(out, "📈 Generating visualizations...")?;
    let path = renderer.render(&analyzed, &stats)?;
    writeln!(out, "✓ Analysis saved to {}", path.display())?;

    for line in console_lines(&stats, days) {
        writeln!(out, "{}", line)?;
    }
    info!("Run completed: {} rows analyzed", analyzed.len());

    Ok(RunOutcome::Completed(stats))
}

/// Any fetch error becomes an absent result after being reported.
async fn fetch_prices<F, W>(
    fetcher: &F,
    days: u32,
    out: &mut W,
) -> Result<Option<PriceTable>, PipelineError>
where
    F: PriceFetcher,
    W: Write,
{
    match fetcher.fetch(days).await {
        Ok(table) => Ok(Some(table)),
        Err(e) => {
            error!("Fetch failed: {}", e);
            writeln!(out, "Error fetching data: {}", e)?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalyzerImpl;
    use crate::model::{AnalyzedTable, FetchError, PricePoint, RenderError};
    use chrono::{Duration, TimeZone, Utc};
    use std::cell::Cell;
    use std::path::PathBuf;

    struct StaticFetcher {
        prices: Vec<f64>,
    }

    #[async_trait::async_trait]
    impl PriceFetcher for StaticFetcher {
        fn asset_name(&self) -> &str {
            "Bitcoin"
        }

        async fn fetch(&self, _days: u32) -> Result<PriceTable, FetchError> {
            if self.prices.is_empty() {
                return Err(FetchError::Empty);
            }
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            Ok(PriceTable::from_points(
                self.prices
                    .iter()
                    .enumerate()
                    .map(|(i, &price)| PricePoint {
                        date: start + Duration::days(i as i64),
                        price,
                    })
                    .collect(),
            ))
        }
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Cell<usize>,
        rows: Cell<usize>,
    }

    impl ChartRenderer for RecordingRenderer {
        fn render(
            &self,
            table: &AnalyzedTable,
            _stats: &MarketStats,
        ) -> Result<PathBuf, RenderError> {
            self.calls.set(self.calls.get() + 1);
            self.rows.set(table.len());
            Ok(PathBuf::from("crypto_analysis.svg"))
        }
    }

    struct FailingRenderer;

    impl ChartRenderer for FailingRenderer {
        fn render(&self, _: &AnalyzedTable, _: &MarketStats) -> Result<PathBuf, RenderError> {
            Err(RenderError::Draw("disk full".into()))
        }
    }

    #[tokio::test]
    async fn failed_fetch_skips_analysis_and_rendering() {
        let renderer = RecordingRenderer::default();
        let mut out = Vec::new();

        let outcome = run(
            &StaticFetcher { prices: vec![] },
            &AnalyzerImpl::new(),
            &renderer,
            30,
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(outcome, RunOutcome::FetchFailed);
        assert_eq!(renderer.calls.get(), 0);
        assert!(text.contains("Error fetching data: no price data returned"));
        assert!(text.ends_with("❌ Failed to fetch data\n"));
        assert!(!text.contains("Analyzing"));
    }

    #[tokio::test]
    async fn successful_run_renders_and_prints_summary() {
        let mut prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        prices[29] = 150.0;
        let renderer = RecordingRenderer::default();
        let mut out = Vec::new();

        let outcome = run(
            &StaticFetcher { prices },
            &AnalyzerImpl::new(),
            &renderer,
            30,
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let RunOutcome::Completed(stats) = outcome else {
            panic!("expected a completed run");
        };
        assert_eq!(renderer.calls.get(), 1);
        assert_eq!(renderer.rows.get(), 30);
        assert!((stats.total_return - 50.0).abs() < 1e-10);
        assert!(text.contains("✓ Loaded 30 days of data"));
        assert!(text.contains("✓ Analysis saved to crypto_analysis.svg"));
        assert!(text.contains("Current Price: $150.00"));
        assert!(text.contains("30-Day Low: $100.00"));
        assert!(text.contains("Total Return: 50.00%"));
    }

    #[tokio::test]
    async fn short_history_still_completes() {
        let renderer = RecordingRenderer::default();
        let mut out = Vec::new();

        let outcome = run(
            &StaticFetcher { prices: vec![100.0, 110.0] },
            &AnalyzerImpl::new(),
            &renderer,
            2,
            &mut out,
        )
        .await
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(matches!(outcome, RunOutcome::Completed(_)));
        assert!(text.contains("Avg Volatility: n/a"));
        assert!(text.contains("Total Return: 10.00%"));
    }

    #[tokio::test]
    async fn render_failure_propagates() {
        let mut out = Vec::new();

        let result = run(
            &StaticFetcher { prices: vec![1.0; 20] },
            &AnalyzerImpl::new(),
            &FailingRenderer,
            20,
            &mut out,
        )
        .await;

        assert!(matches!(result, Err(PipelineError::Render(_))));
    }
}
