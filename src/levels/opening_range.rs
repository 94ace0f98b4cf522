// =============================================================================
// Opening Range Extractor
// =============================================================================
//
// Window = [t0, t0 + window_secs), half-open, where t0 is the timestamp of the
// first candle in the series as delivered. Every candle whose time falls in
// the window contributes, wherever it sits in the series.
//
// The first candle always lies inside its own window, so the band is never
// empty for a non-empty series. When nothing else falls in the window (a gap
// after the open), the band is exactly the first candle's high/low.
// =============================================================================

use crate::types::{Candle, OpeningRange};

/// Five minutes, in the same unit as `Candle::time`.
pub const OPENING_WINDOW_SECS: i64 = 300;

/// Reduce the opening window to its high/low. `None` for an empty series.
pub fn first_range(candles: &[Candle], window_secs: i64) -> Option<OpeningRange> {
    let first = candles.first()?;
    let start = first.time;
    let end = start.saturating_add(window_secs.max(1));

    let range = candles
        .iter()
        .filter(|c| c.time >= start && c.time < end)
        .fold(
            OpeningRange {
                high: first.high,
                low: first.low,
            },
            |acc, c| OpeningRange {
                high: acc.high.max(c.high),
                low: acc.low.min(c.low),
            },
        );

    Some(range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candle(time: i64, high: f64, low: f64) -> Candle {
        Candle {
            time,
            open: low,
            high,
            low,
            close: high,
            volume: 10.0,
        }
    }

    #[test]
    fn empty_series_has_no_range() {
        assert!(first_range(&[], OPENING_WINDOW_SECS).is_none());
    }

    #[test]
    fn reduces_first_five_minutes() {
        let candles: Vec<Candle> = vec![
            candle(1_000, 100.0, 97.0),
            candle(1_060, 99.0, 95.0),
            candle(1_120, 98.0, 96.0),
            candle(1_180, 97.5, 96.5),
            candle(1_240, 99.5, 96.0),
            // t0 + 300 is outside the half-open window.
            candle(1_300, 120.0, 90.0),
        ];
        let range = first_range(&candles, OPENING_WINDOW_SECS).unwrap();
        assert_eq!(range.high, 100.0);
        assert_eq!(range.low, 95.0);
    }

    #[test]
    fn gap_after_open_falls_back_to_first_candle() {
        let candles = vec![candle(0, 101.0, 99.0), candle(900, 150.0, 50.0)];
        let range = first_range(&candles, OPENING_WINDOW_SECS).unwrap();
        assert_eq!(range, OpeningRange { high: 101.0, low: 99.0 });
    }

    #[test]
    fn single_flat_candle() {
        let range = first_range(&[candle(0, 100.0, 100.0)], OPENING_WINDOW_SECS).unwrap();
        assert_eq!(range.high, range.low);
    }

    #[test]
    fn out_of_order_candles_inside_window_still_count() {
        let candles = vec![
            candle(1_000, 100.0, 99.0),
            candle(5_000, 200.0, 1.0),
            candle(1_100, 102.0, 98.0),
        ];
        let range = first_range(&candles, OPENING_WINDOW_SECS).unwrap();
        assert_eq!(range, OpeningRange { high: 102.0, low: 98.0 });
    }

    #[test]
    fn custom_window_length() {
        let candles = vec![candle(0, 100.0, 99.0), candle(60, 105.0, 98.0)];
        let range = first_range(&candles, 60).unwrap();
        assert_eq!(range, OpeningRange { high: 100.0, low: 99.0 });
    }
}
