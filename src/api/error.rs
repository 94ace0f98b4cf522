// =============================================================================
// API errors — mapping failures onto HTTP responses
// =============================================================================
//
// Clients only ever see a short "no data" style message. The underlying cause
// is logged server-side.
// =============================================================================

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::yahoo::UpstreamStatus;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport or decode failure talking to the chart provider.
    #[error("upstream fetch failed: {0:#}")]
    Upstream(anyhow::Error),

    /// The chart provider answered with a non-success status.
    #[error("upstream returned HTTP {0}")]
    UpstreamStatus(u16),

    /// The fetch succeeded but yielded no usable candles.
    #[error("no candles returned")]
    NoData,
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<UpstreamStatus>() {
            Some(s) => Self::UpstreamStatus(s.status),
            None => Self::Upstream(err),
        }
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Upstream(_) | Self::UpstreamStatus(_) => StatusCode::BAD_GATEWAY,
            Self::NoData => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::Upstream(_) | Self::UpstreamStatus(_) => "Failed to fetch market data",
            Self::NoData => "No candles returned",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self, "intraday request failed");
        let body = serde_json::json!({
            "error": self.public_message(),
        });
        (self.status(), Json(body)).into_response()
    }
}
