use anyhow::{Context, Result};
use sales_collector::{load_sources_config, sources_from_list, FetchConfig, Source, SourcesConfig};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub sources_config: Option<String>,
    pub data_sources: Option<String>,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind: std::env::var("API_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            sources_config: std::env::var("SOURCES_CONFIG").ok().filter(|s| !s.trim().is_empty()),
            data_sources: std::env::var("DATA_SOURCES").ok().filter(|s| !s.trim().is_empty()),
            fetch_timeout_secs: std::env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            user_agent: std::env::var("USER_AGENT")
                .unwrap_or_else(|_| "SalesDashboard/1.0".to_string()),
        }
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            timeout: Duration::from_secs(self.fetch_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }

    /// `DATA_SOURCES` wins over `SOURCES_CONFIG`; neither means the built-in list.
    pub async fn resolve_sources(&self) -> Result<Vec<Source>> {
        if let Some(list) = &self.data_sources {
            return Ok(sources_from_list(list));
        }
        if let Some(path) = &self.sources_config {
            let config = load_sources_config(path)
                .await
                .with_context(|| format!("Failed to load sources config {}", path))?;
            tracing::info!(version = %config.version, path = %path, "loaded sources config");
            return Ok(config.enabled());
        }
        Ok(SourcesConfig::default_sources())
    }
}
