// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// `/` serves the dashboard page; everything it talks to lives under
// `/api/v1/`. A scan is a single POST that runs the whole pipeline and
// returns either the dashboard payload or the error notice.
//
// CORS is configured permissively; the dashboard is a local tool.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, State},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::api::page;
use crate::app_state::AppState;
use crate::scan::{run_scan, ScanRequest};
use crate::types::Interval;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index))
        .route("/api/v1/health", get(health))
        .route("/api/v1/defaults", get(defaults))
        .route("/api/v1/scan", post(scan))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Dashboard page
// =============================================================================

async fn index() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    provider: &'static str,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        provider: state.provider.name(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Form defaults
// =============================================================================

#[derive(Serialize)]
struct DefaultsResponse {
    symbol: String,
    timeframe: Interval,
    timeframes: [Interval; 4],
    risk_per_trade: f64,
    currency_symbol: String,
}

async fn defaults(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cfg = &state.config;
    Json(DefaultsResponse {
        symbol: cfg.default_symbol.clone(),
        timeframe: cfg.default_timeframe,
        timeframes: Interval::ALL,
        risk_per_trade: cfg.default_risk_per_trade,
        currency_symbol: cfg.currency_symbol.clone(),
    })
}

// =============================================================================
// Scan
// =============================================================================

fn bad_request(message: String) -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
}

async fn scan(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ScanRequest>, JsonRejection>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let Json(request) = body.map_err(|e| {
        warn!(error = %e, "rejected scan request body");
        bad_request(e.body_text())
    })?;

    let params = request.resolve(&state.config).map_err(|e| {
        warn!(error = %e, "rejected scan parameters");
        bad_request(format!("{e:#}"))
    })?;

    info!(symbol = %params.symbol, timeframe = %params.timeframe, "scan requested");
    let report = run_scan(state.provider.as_ref(), &state.config, params).await;
    Ok(Json(report))
}
