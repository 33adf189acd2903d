use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use sales_parser::CanonicalRow;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::dashboard::{build_dashboard, filter_options, DashboardView, FilterOptions};
use crate::filter::{FilterCriteria, FilterQuery};

// ============================================================================
// State
// ============================================================================

/// The dataset is loaded once at startup and only read afterwards.
pub struct AppState {
    pub rows: Vec<CanonicalRow>,
}

impl AppState {
    pub fn new(rows: Vec<CanonicalRow>) -> Self {
        Self { rows }
    }
}

// ============================================================================
// Response types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: &'static str,
    pub rows: usize,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION"),
        rows: state.rows.len(),
    })
}

pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FilterQuery>,
) -> Json<DashboardView> {
    let criteria = FilterCriteria::from(&params);
    tracing::debug!(?criteria, "dashboard refresh");
    Json(build_dashboard(&state.rows, &criteria))
}

pub async fn options_handler(State(state): State<Arc<AppState>>) -> Json<FilterOptions> {
    Json(filter_options(&state.rows))
}

pub fn router(state: Arc<AppState>) -> Router {
    // CORS for web frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/options", get(options_handler))
        .layer(cors)
        .with_state(state)
}
