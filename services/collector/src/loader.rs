//! Multi-source loading with per-source failure isolation.
//!
//! Every source is fetched in its own task; all tasks are joined in source
//! order before normalization starts. A failing source contributes no rows
//! and a warning, never an error.

use sales_parser::{decode_text, normalize_all, parse_delimited, CanonicalRow, ParseOptions, RawRecord};
use serde::Serialize;

use crate::fetch::{fetch_source, SourceError};
use crate::sources::Source;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SourceStatus {
    Loaded { records: usize, content_hash: String },
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub id: String,
    pub location: String,
    #[serde(flatten)]
    pub status: SourceStatus,
}

impl SourceReport {
    pub fn is_loaded(&self) -> bool {
        matches!(self.status, SourceStatus::Loaded { .. })
    }
}

/// The canonical dataset plus how each source fared.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub rows: Vec<CanonicalRow>,
    pub reports: Vec<SourceReport>,
    pub used_fallback: bool,
}

/// Rows used when no source produced any record. Intentionally empty.
pub fn fallback_dataset() -> Vec<CanonicalRow> {
    Vec::new()
}

/// Fetch, decode and parse one source.
async fn load_one(
    client: &reqwest::Client,
    location: &str,
    options: &ParseOptions,
) -> Result<(Vec<RawRecord>, String), SourceError> {
    let fetched = fetch_source(client, location).await?;
    let content = decode_text(&fetched.bytes);
    let records = parse_delimited(&content, options).map_err(|source| SourceError::Parse {
        location: location.to_string(),
        source,
    })?;
    Ok((records, fetched.content_hash))
}

/// Load every source concurrently and normalize the concatenation.
pub async fn load_sources(
    client: &reqwest::Client,
    sources: &[Source],
    options: &ParseOptions,
) -> LoadedDataset {
    let handles: Vec<_> = sources
        .iter()
        .map(|source| {
            let client = client.clone();
            let location = source.location.clone();
            let options = options.clone();
            tokio::spawn(async move { load_one(&client, &location, &options).await })
        })
        .collect();

    let mut combined: Vec<RawRecord> = Vec::new();
    let mut reports = Vec::with_capacity(sources.len());

    for (source, handle) in sources.iter().zip(handles) {
        let outcome = handle.await.unwrap_or_else(|e| {
            Err(SourceError::Join {
                location: source.location.clone(),
                reason: e.to_string(),
            })
        });

        let status = match outcome {
            Ok((records, content_hash)) => {
                tracing::debug!(source = %source.id, records = records.len(), "source parsed");
                let status = SourceStatus::Loaded {
                    records: records.len(),
                    content_hash,
                };
                combined.extend(records);
                status
            }
            Err(e) => {
                tracing::warn!(source = %source.id, error = %e, "failed to load source");
                SourceStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        reports.push(SourceReport {
            id: source.id.clone(),
            location: source.location.clone(),
            status,
        });
    }

    if combined.is_empty() {
        tracing::warn!("no data loaded, switching to fallback dataset");
        return LoadedDataset {
            rows: fallback_dataset(),
            reports,
            used_fallback: true,
        };
    }

    let rows = normalize_all(&combined);
    tracing::info!(rows = rows.len(), "total rows loaded");

    LoadedDataset {
        rows,
        reports,
        used_fallback: false,
    }
}
