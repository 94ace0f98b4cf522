// =============================================================================
// Application State — shared by every HTTP handler
// =============================================================================
//
// Read-only after startup apart from the request counter. No analysis output
// is retained between requests.
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;

use crate::engine::AnalysisParams;
use crate::runtime_config::RuntimeConfig;
use crate::yahoo::ChartClient;

pub struct AppState {
    pub chart_client: ChartClient,
    pub analysis: AnalysisParams,
    /// Number of intraday analyses served since startup.
    requests_served: AtomicU64,
}

impl AppState {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        Ok(Self {
            chart_client: ChartClient::new(config)?,
            analysis: config.analysis.normalized(),
            requests_served: AtomicU64::new(0),
        })
    }

    pub fn record_request(&self) -> u64 {
        self.requests_served.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests_served(&self) -> u64 {
        self.requests_served.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_starts_at_zero_and_increments() {
        let state = AppState::new(&RuntimeConfig::default()).unwrap();
        assert_eq!(state.requests_served(), 0);
        assert_eq!(state.record_request(), 1);
        assert_eq!(state.record_request(), 2);
        assert_eq!(state.requests_served(), 2);
    }
}
