use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Days of history requested from the market-chart endpoint.
    pub days: u32,
    pub api_base_url: String,
    /// Demo API key, sent as `x-cg-demo-api-key` when present.
    pub api_key: Option<String>,
    pub output_path: PathBuf,
    /// Open the written chart in the platform viewer.
    pub show_chart: bool,
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            days: 30,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            output_path: PathBuf::from("crypto_analysis.svg"),
            show_chart: true,
            chart_width: 1400,
            chart_height: 1000,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("days must be a positive integer")]
    InvalidDays,
}

/// Loads the configuration, falling back to defaults when the file does not exist.
pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let path = path.as_ref();
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("No {} found, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    if config.days == 0 {
        return Err(ConfigError::InvalidDays);
    }
    Ok(config)
}
