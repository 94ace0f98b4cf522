// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are public:
//   GET /api/v1/health             liveness + counters
//   GET /api/v1/intraday           fetch, analyse, return the full report
//   GET /api/v1/settings/defaults  default RSI settings and active policy
//
// CORS is permissive; the dashboard is served from a different origin.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::api::error::ApiError;
use crate::app_state::AppState;
use crate::engine::{self, AnalysisParams, ConfluenceReport};
use crate::settings::{RawRsiSettings, RsiSettings};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/intraday", get(intraday))
        .route("/api/v1/settings/defaults", get(settings_defaults))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    symbol: String,
    requests_served: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        symbol: state.chart_client.symbol().to_string(),
        requests_served: state.requests_served(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Intraday analysis
// =============================================================================

/// Query parameters are kept as text so that junk degrades to defaults
/// instead of a 400.
#[derive(Debug, Default, Deserialize)]
struct IntradayQuery {
    period: Option<String>,
    overbought: Option<String>,
    oversold: Option<String>,
    smoothing: Option<String>,
}

impl IntradayQuery {
    fn settings(&self) -> RsiSettings {
        RsiSettings::normalize(RawRsiSettings::from_strs(
            self.period.as_deref(),
            self.overbought.as_deref(),
            self.oversold.as_deref(),
            self.smoothing.as_deref(),
        ))
    }
}

async fn intraday(
    State(state): State<Arc<AppState>>,
    Query(query): Query<IntradayQuery>,
) -> Result<Json<ConfluenceReport>, ApiError> {
    let settings = query.settings();

    let raw = state.chart_client.fetch_intraday().await?;
    let report = engine::analyze(&raw, settings, state.analysis);

    if report.candles.is_empty() {
        return Err(ApiError::NoData);
    }

    let served = state.record_request();
    info!(
        candles = report.candles.len(),
        rsi = report.rsi.len(),
        signals = report.confluence.len(),
        period = settings.period,
        smoothing = settings.smoothing,
        served,
        "intraday analysis served"
    );

    Ok(Json(report))
}

// =============================================================================
// Defaults
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DefaultsResponse {
    rsi_settings: RsiSettings,
    analysis: AnalysisParams,
}

async fn settings_defaults(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(DefaultsResponse {
        rsi_settings: RsiSettings::default(),
        analysis: state.analysis,
    })
}
