//! API Service - Sales dashboard backend
//!
//! Loads every configured source once at startup, then serves filtered
//! aggregates for the dashboard front-end.
//!
//! Endpoints:
//! - GET /health - Health check and loaded row count
//! - GET /dashboard - KPIs, chart series and tables for the current filters
//! - GET /options - Values for the year/region/segment dropdowns

use anyhow::Context;
use sales_api::{router, AppState, Config};
use sales_collector::{build_client, load_sources};
use sales_parser::ParseOptions;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();

    println!("=== Sales Dashboard API ===");

    let sources = config.resolve_sources().await?;
    println!("Loading {} source(s)...", sources.len());

    let client = build_client(&config.fetch_config()).context("Failed to build HTTP client")?;
    let dataset = load_sources(&client, &sources, &ParseOptions::default()).await;

    let loaded = dataset.reports.iter().filter(|r| r.is_loaded()).count();
    println!(
        "Sources loaded: {}/{} ({} rows)",
        loaded,
        dataset.reports.len(),
        dataset.rows.len()
    );
    if dataset.used_fallback {
        println!("No records found - serving empty fallback dataset");
    }

    let state = Arc::new(AppState::new(dataset.rows));
    let app = router(state);

    println!("API listening on http://{}", config.bind);
    println!("\nEndpoints:");
    println!("  GET /health");
    println!("  GET /dashboard?year=&region=&segment=&min_sales=&max_sales=&min_quantity=&max_discount_pct=");
    println!("  GET /options");

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    axum::serve(listener, app).await?;

    Ok(())
}
