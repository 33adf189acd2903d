//! Source configuration: which delimited extracts feed the dashboard.

use anyhow::{Context, Result};
use serde::Deserialize;
use tokio::fs;

/// Locations used when no configuration is given.
pub const DEFAULT_LOCATIONS: &[&str] = &[
    "data/sales_2015.csv",
    "data/sales_2016.csv",
    "data/sales_2017.csv",
];

#[derive(Debug, Deserialize)]
pub struct SourcesConfig {
    pub version: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    pub id: String,
    /// http(s) URL, file:// URL or plain filesystem path
    pub location: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl Source {
    /// Build a source from a bare location, deriving the id from its file name.
    pub fn from_location(location: &str) -> Self {
        let id = location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or(location)
            .trim_end_matches(".csv")
            .to_string();

        Self {
            id,
            location: location.to_string(),
            description: String::new(),
            enabled: true,
        }
    }
}

impl SourcesConfig {
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse sources config")
    }

    pub fn default_sources() -> Vec<Source> {
        DEFAULT_LOCATIONS.iter().map(|l| Source::from_location(l)).collect()
    }

    /// Enabled sources in configuration order.
    pub fn enabled(&self) -> Vec<Source> {
        self.sources.iter().filter(|s| s.enabled).cloned().collect()
    }
}

/// Load sources configuration from a JSON file
pub async fn load_sources_config(path: &str) -> Result<SourcesConfig> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read sources config {}", path))?;
    SourcesConfig::from_json(&content)
}

/// Parse a comma-separated location list (e.g. from `DATA_SOURCES`).
pub fn sources_from_list(list: &str) -> Vec<Source> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Source::from_location)
        .collect()
}
