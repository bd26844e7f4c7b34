use crate::model::MarketStats;
use crate::utils::format_opt;

const RULE_WIDTH: usize = 50;

/// Lines of the "Summary Statistics" chart panel.
pub fn panel_lines(stats: &MarketStats) -> Vec<String> {
    vec![
        "Summary Statistics:".to_string(),
        String::new(),
        format!("Price Range: ${:.2} - ${:.2}", stats.min_price, stats.max_price),
        format!("Avg Price: ${:.2}", stats.avg_price),
        format!("Volatility: {}", format_opt(stats.avg_volatility, "")),
        format!("Avg Daily Change: {}", format_opt(stats.avg_change, "%")),
        format!("Max Gain: {}", format_opt(stats.max_gain, "%")),
        format!("Max Loss: {}", format_opt(stats.max_loss, "%")),
    ]
}

/// Final console report printed after the chart is written.
pub fn console_lines(stats: &MarketStats, days: u32) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    vec![
        String::new(),
        rule.clone(),
        "ANALYSIS SUMMARY".to_string(),
        rule,
        format!("Current Price: ${:.2}", stats.current_price),
        format!("{}-Day High: ${:.2}", days, stats.max_price),
        format!("{}-Day Low: ${:.2}", days, stats.min_price),
        format!("Avg Volatility: {}", format_opt(stats.avg_volatility, "")),
        format!("Total Return: {:.2}%", stats.total_return),
    ]
}
