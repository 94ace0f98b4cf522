// =============================================================================
// Yahoo Finance chart client
// =============================================================================
//
// Fetches one intraday chart for the configured symbol and hands back raw bar
// records. Transport and decode failures surface as errors; what to do about
// them is the caller's call. Retries are not attempted here.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::{debug, instrument};

use crate::market_data::candle_series::RawCandle;
use crate::runtime_config::RuntimeConfig;
use crate::yahoo::chart::ChartResponse;

/// Upstream answered, but not with a success status.
#[derive(Debug, thiserror::Error)]
#[error("chart endpoint returned HTTP {status}")]
pub struct UpstreamStatus {
    pub status: u16,
}

#[derive(Clone)]
pub struct ChartClient {
    base_url: String,
    symbol: String,
    interval: String,
    range: String,
    include_pre_post: bool,
    client: reqwest::Client,
}

impl ChartClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        if let Ok(val) = HeaderValue::from_str(&config.user_agent) {
            default_headers.insert(USER_AGENT, val);
        }

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
            .build()
            .context("failed to build reqwest client")?;

        let base_url = config.chart_base_url.trim_end_matches('/').to_string();
        debug!(base_url = %base_url, symbol = %config.symbol, "ChartClient initialised");

        Ok(Self {
            base_url,
            symbol: config.symbol.clone(),
            interval: config.interval.clone(),
            range: config.range.clone(),
            include_pre_post: config.include_pre_post,
            client,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Full chart URL for the configured symbol, without query string.
    pub fn chart_url(&self) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, encode_symbol(&self.symbol))
    }

    // -------------------------------------------------------------------------
    // Market data
    // -------------------------------------------------------------------------

    /// GET /v8/finance/chart/{symbol} — the session's intraday bars.
    ///
    /// A non-success status is reported as [`UpstreamStatus`] inside the
    /// returned error so callers can tell it apart from transport failures.
    #[instrument(skip(self), fields(symbol = %self.symbol), name = "yahoo::fetch_intraday")]
    pub async fn fetch_intraday(&self) -> Result<Vec<RawCandle>> {
        let include_pre_post = if self.include_pre_post { "true" } else { "false" };

        let resp = self
            .client
            .get(self.chart_url())
            .query(&[
                ("interval", self.interval.as_str()),
                ("range", self.range.as_str()),
                ("includePrePost", include_pre_post),
            ])
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        if !status.is_success() {
            return Err(UpstreamStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let body: ChartResponse = resp
            .json()
            .await
            .context("failed to parse chart response")?;

        let raw = body.into_raw_candles();
        debug!(count = raw.len(), "chart records fetched");
        Ok(raw)
    }
}

impl std::fmt::Debug for ChartClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartClient")
            .field("base_url", &self.base_url)
            .field("symbol", &self.symbol)
            .field("interval", &self.interval)
            .field("range", &self.range)
            .finish()
    }
}

/// Index symbols carry a leading caret which must be escaped in the path.
fn encode_symbol(symbol: &str) -> String {
    symbol.replace('^', "%5E")
}
