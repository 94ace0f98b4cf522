// =============================================================================
// Confluence Detector
// =============================================================================
//
// Stateless single pass. Each candle that owns an RSI value (candle index
// k + period for RSI index k) is checked against every level:
//
//   1. proximity:  |close - level| <= tolerance * close
//   2. momentum:   resistance => rsi >= overbought
//                  support    => rsi <= oversold
//
// Both must hold for the same candle/level pair. A candle can fire once per
// level. Output is ascending by candle time; signals sharing a candle are
// ordered nearest level first, ties keeping resistance-before-support and
// near-before-far.
// =============================================================================

use tracing::debug;

use crate::settings::RsiSettings;
use crate::types::{Candle, ConfluenceSignal, EnrichedLevels, Level, LevelSide, SignalKind};

/// Default proximity band: 0.1% of the candle's close.
pub const DEFAULT_PROXIMITY_TOLERANCE: f64 = 0.001;

/// Emit a signal for every candle/level pair where price and RSI agree.
///
/// Returns an empty vec when `levels` is `None` or `rsi` is empty.
pub fn analyze_confluence(
    candles: &[Candle],
    levels: Option<&EnrichedLevels>,
    rsi: &[f64],
    settings: &RsiSettings,
    tolerance: f64,
) -> Vec<ConfluenceSignal> {
    let Some(levels) = levels else {
        return Vec::new();
    };
    if rsi.is_empty() {
        return Vec::new();
    }

    let offset = settings.period;
    let mut scored: Vec<(i64, f64, ConfluenceSignal)> = Vec::new();

    for (k, &value) in rsi.iter().enumerate() {
        let Some(candle) = candles.get(k + offset) else {
            break;
        };

        for (side, level) in levels.iter() {
            let distance = (candle.close - level.value).abs();
            if distance > tolerance * candle.close {
                continue;
            }
            if !momentum_confirms(side, value, settings) {
                continue;
            }
            scored.push((
                candle.time,
                distance,
                ConfluenceSignal {
                    kind: SignalKind::for_side(side),
                    level: level.clone(),
                    candle: *candle,
                    message: describe(side, level, candle, value, settings),
                },
            ));
        }
    }

    // Stable: equal (time, distance) keeps emission order.
    scored.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));

    debug!(
        scored_candles = aligned_candles(candles, rsi, offset),
        signals = scored.len(),
        "confluence scan complete"
    );

    scored.into_iter().map(|(_, _, s)| s).collect()
}

/// Number of candles that own an RSI value under the period offset.
fn aligned_candles(candles: &[Candle], rsi: &[f64], period: usize) -> usize {
    rsi.len().min(candles.len().saturating_sub(period))
}

fn momentum_confirms(side: LevelSide, rsi: f64, settings: &RsiSettings) -> bool {
    match side {
        LevelSide::Resistance => rsi >= settings.overbought,
        LevelSide::Support => rsi <= settings.oversold,
    }
}

fn describe(side: LevelSide, level: &Level, candle: &Candle, rsi: f64, settings: &RsiSettings) -> String {
    match side {
        LevelSide::Resistance => format!(
            "Price {:.2} testing {} ({:.2}) with RSI {:.1} at or above overbought {:.0}; watch for rejection",
            candle.close, level.name, level.value, rsi, settings.overbought
        ),
        LevelSide::Support => format!(
            "Price {:.2} testing {} ({:.2}) with RSI {:.1} at or below oversold {:.0}; watch for a bounce",
            candle.close, level.name, level.value, rsi, settings.oversold
        ),
    }
}
