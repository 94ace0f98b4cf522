// =============================================================================
// Confluence Engine — the pure analysis pipeline
// =============================================================================
//
//   raw records ─► validate ─┬─► first_range ─► build_levels ─┐
//                            └─► compute_rsi ─────────────────┴─► analyze_confluence
//
// Every call recomputes from the full batch. Nothing is cached or shared, so
// concurrent requests can run the pipeline side by side without locking.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::rsi::{compute_rsi, latest_reading, RsiReading};
use crate::levels::{build_levels, first_range, LevelFractions, OPENING_WINDOW_SECS};
use crate::market_data::{validate, RawCandle};
use crate::settings::RsiSettings;
use crate::signals::analyze_confluence;
use crate::signals::confluence::DEFAULT_PROXIMITY_TOLERANCE;
use crate::types::{Candle, ConfluenceSignal, EnrichedLevels, OpeningRange};

/// Largest accepted proximity band (5% of price).
const MAX_PROXIMITY_TOLERANCE: f64 = 0.05;

fn default_opening_window_secs() -> i64 {
    OPENING_WINDOW_SECS
}

fn default_near_fraction() -> f64 {
    LevelFractions::default().near
}

fn default_far_fraction() -> f64 {
    LevelFractions::default().far
}

fn default_proximity_tolerance() -> f64 {
    DEFAULT_PROXIMITY_TOLERANCE
}

/// Level-projection and detection policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Length of the opening window in seconds.
    #[serde(default = "default_opening_window_secs")]
    pub opening_window_secs: i64,

    /// Span multiple for R1/S1.
    #[serde(default = "default_near_fraction")]
    pub near_fraction: f64,

    /// Span multiple for R2/S2.
    #[serde(default = "default_far_fraction")]
    pub far_fraction: f64,

    /// Relative distance from a level that still counts as "at" the level.
    #[serde(default = "default_proximity_tolerance")]
    pub proximity_tolerance: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            opening_window_secs: default_opening_window_secs(),
            near_fraction: default_near_fraction(),
            far_fraction: default_far_fraction(),
            proximity_tolerance: default_proximity_tolerance(),
        }
    }
}

impl AnalysisParams {
    /// Replace each invalid field with its default. The two fractions are
    /// validated as a pair.
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let fractions = LevelFractions {
            near: self.near_fraction,
            far: self.far_fraction,
        }
        .normalized();

        let tolerance_ok = self.proximity_tolerance.is_finite()
            && self.proximity_tolerance > 0.0
            && self.proximity_tolerance <= MAX_PROXIMITY_TOLERANCE;

        Self {
            opening_window_secs: if self.opening_window_secs > 0 {
                self.opening_window_secs
            } else {
                defaults.opening_window_secs
            },
            near_fraction: fractions.near,
            far_fraction: fractions.far,
            proximity_tolerance: if tolerance_ok {
                self.proximity_tolerance
            } else {
                defaults.proximity_tolerance
            },
        }
    }

    pub fn fractions(&self) -> LevelFractions {
        LevelFractions {
            near: self.near_fraction,
            far: self.far_fraction,
        }
    }
}

/// Everything the presentation layer consumes, built once per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfluenceReport {
    pub candles: Vec<Candle>,
    pub levels: Option<EnrichedLevels>,
    pub first_range: Option<OpeningRange>,
    pub rsi: Vec<f64>,
    pub rsi_settings: RsiSettings,
    pub confluence: Vec<ConfluenceSignal>,
    pub latest_rsi: Option<RsiReading>,
}

/// Run the full pipeline over one batch of upstream records.
///
/// Never fails: an empty or fully-invalid batch produces `None` range/levels
/// and empty RSI/signal sequences. Settings are normalized here so the RSI
/// series and the detector agree on the period offset.
pub fn analyze(raw: &[RawCandle], settings: RsiSettings, params: AnalysisParams) -> ConfluenceReport {
    let settings = RsiSettings::normalize(settings.into());
    let params = params.normalized();
    let candles = validate(raw);

    let first_range = first_range(&candles, params.opening_window_secs);
    let levels = build_levels(first_range.as_ref(), params.fractions());
    let rsi = compute_rsi(&candles, &settings);
    let confluence = analyze_confluence(
        &candles,
        levels.as_ref(),
        &rsi,
        &settings,
        params.proximity_tolerance,
    );
    let latest_rsi = latest_reading(&rsi, &settings);

    debug!(
        candles = candles.len(),
        rsi = rsi.len(),
        signals = confluence.len(),
        has_levels = levels.is_some(),
        "analysis complete"
    );

    ConfluenceReport {
        candles,
        levels,
        first_range,
        rsi,
        rsi_settings: settings,
        confluence,
        latest_rsi,
    }
}
