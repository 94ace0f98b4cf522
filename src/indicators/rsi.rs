// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// Step 1 — Compute price deltas from consecutive closes.
// Step 2 — Split into gains (positive deltas) and losses (|negative deltas|).
// Step 3 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 4 — Apply Wilder's smoothing with window `smoothing`:
//            avg = (avg * (smoothing - 1) + value) / smoothing
// Step 5 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Alignment: output index k belongs to candle index k + period. The first
// `period` candles only seed the averages.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::settings::RsiSettings;
use crate::types::Candle;

/// Compute the RSI series over the candle closes.
///
/// Output length is `max(candles.len() - period, 0)`.
///
/// # Edge cases
/// - `candles.len() <= period` => empty vec
/// - average loss zero with gains => 100.0
/// - both averages zero (flat market) => 50.0
pub fn compute_rsi(candles: &[Candle], settings: &RsiSettings) -> Vec<f64> {
    let period = settings.period.max(1);
    if candles.len() <= period {
        return Vec::new();
    }

    let deltas: Vec<f64> = candles.windows(2).map(|w| w[1].close - w[0].close).collect();

    let (sum_gain, sum_loss) = deltas[..period]
        .iter()
        .fold((0.0_f64, 0.0_f64), |(g, l), &d| (g + gain(d), l + loss(d)));

    let period_f = period as f64;
    let smoothing_f = settings.smoothing.max(1) as f64;
    let mut avg_gain = sum_gain / period_f;
    let mut avg_loss = sum_loss / period_f;

    let mut result = Vec::with_capacity(candles.len() - period);
    result.push(rsi_from_averages(avg_gain, avg_loss));

    for &delta in &deltas[period..] {
        // Same recurrence as (avg * (n - 1) + v) / n, arranged so the
        // intermediate product cannot overflow.
        avg_gain += (gain(delta) - avg_gain) / smoothing_f;
        avg_loss += (loss(delta) - avg_loss) / smoothing_f;
        result.push(rsi_from_averages(avg_gain, avg_loss));
    }

    result
}

/// Where an RSI reading sits relative to the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RsiZone {
    Overbought,
    Oversold,
    Neutral,
}

/// The most recent RSI value with its zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
    pub value: f64,
    pub zone: RsiZone,
}

/// Classify a single RSI value. Thresholds are inclusive.
pub fn zone_of(value: f64, settings: &RsiSettings) -> RsiZone {
    if value >= settings.overbought {
        RsiZone::Overbought
    } else if value <= settings.oversold {
        RsiZone::Oversold
    } else {
        RsiZone::Neutral
    }
}

/// Most recent value of an RSI series, or `None` when the series is empty.
pub fn latest_reading(rsi: &[f64], settings: &RsiSettings) -> Option<RsiReading> {
    let value = *rsi.last()?;
    Some(RsiReading {
        value,
        zone: zone_of(value, settings),
    })
}

// =============================================================================
// Internal helpers
// =============================================================================

fn gain(delta: f64) -> f64 {
    delta.max(0.0)
}

fn loss(delta: f64) -> f64 {
    (-delta).max(0.0)
}

/// Convert average gain / average loss into an RSI value in [0, 100].
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0
    } else if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
    }
}
