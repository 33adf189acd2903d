//! Retrieval of one source's raw text.

use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;
use tokio::fs;

/// Why a single source contributed nothing.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to '{location}' failed: {source}")]
    Http {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("'{location}' answered HTTP {status}")]
    Status { location: String, status: u16 },
    #[error("cannot read '{location}': {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse '{location}': {source}")]
    Parse {
        location: String,
        #[source]
        source: csv::Error,
    },
    #[error("fetch task for '{location}' did not complete: {reason}")]
    Join { location: String, reason: String },
}

/// HTTP client settings shared by every fetch.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: "SalesDashboard/1.0".to_string(),
        }
    }
}

pub fn build_client(config: &FetchConfig) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()
}

/// Raw bytes of one source plus their fingerprint.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub bytes: Vec<u8>,
    pub content_hash: String,
}

fn is_http(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Fetch a location: http(s) through `client`, everything else from disk.
pub async fn fetch_source(client: &reqwest::Client, location: &str) -> Result<Fetched, SourceError> {
    let bytes = if is_http(location) {
        fetch_http(client, location).await?
    } else {
        let path = location.strip_prefix("file://").unwrap_or(location);
        fs::read(path).await.map_err(|source| SourceError::Io {
            location: location.to_string(),
            source,
        })?
    };

    let content_hash = content_hash(&bytes);
    tracing::debug!(location, size = bytes.len(), hash = %content_hash, "fetched source");

    Ok(Fetched { bytes, content_hash })
}

async fn fetch_http(client: &reqwest::Client, location: &str) -> Result<Vec<u8>, SourceError> {
    let http_err = |source| SourceError::Http {
        location: location.to_string(),
        source,
    };

    let resp = client.get(location).send().await.map_err(http_err)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            location: location.to_string(),
            status: status.as_u16(),
        });
    }

    let bytes = resp.bytes().await.map_err(http_err)?;
    Ok(bytes.to_vec())
}

pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}
