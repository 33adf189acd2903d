//! Sales Collector - Loads the dashboard dataset from its sources
//!
//! Responsibilities:
//! - Read the sources configuration (or fall back to the built-in list)
//! - Fetch every source concurrently (HTTP or local file)
//! - Isolate failures: a broken source contributes nothing, never aborts
//! - Concatenate records in source order and normalize them
//! - Fall back to an empty dataset when nothing loaded

pub mod fetch;
pub mod loader;
pub mod sources;

pub use fetch::{build_client, fetch_source, FetchConfig, SourceError};
pub use loader::{fallback_dataset, load_sources, LoadedDataset, SourceReport, SourceStatus};
pub use sources::{load_sources_config, sources_from_list, Source, SourcesConfig};
