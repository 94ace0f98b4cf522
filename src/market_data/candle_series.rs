// =============================================================================
// Candle Series — fail-soft validation of upstream bar records
// =============================================================================
//
// This is the single boundary where "missing field" becomes "record dropped".
// Nothing downstream ever sees an optional price.
//
// Only missing or non-finite fields drop a record. Bars whose body pokes
// outside high/low, or with a non-positive price or negative volume, are
// kept as delivered and only counted in the debug log.
//
// Order is preserved as delivered. Out-of-order or duplicate timestamps pass
// through untouched; later stages tolerate them.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Candle;

/// A candidate bar as delivered upstream; any field may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCandle {
    pub time: Option<i64>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawCandle {
    /// Convert into a [`Candle`] if every field is present and finite.
    pub fn into_candle(self) -> Option<Candle> {
        Some(Candle {
            time: self.time?,
            open: finite(self.open)?,
            high: finite(self.high)?,
            low: finite(self.low)?,
            close: finite(self.close)?,
            volume: finite(self.volume)?,
        })
    }
}

/// `low <= open, close <= high`, positive low and non-negative volume.
fn is_consistent(c: &Candle) -> bool {
    c.low > 0.0
        && c.low <= c.open.min(c.close)
        && c.open.max(c.close) <= c.high
        && c.volume >= 0.0
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|x| x.is_finite())
}

/// Drop every record that cannot become a valid [`Candle`], keeping the rest
/// in their original order. Never fails; the result may be empty.
pub fn validate(raw: &[RawCandle]) -> Vec<Candle> {
    let candles: Vec<Candle> = raw.iter().filter_map(|r| r.into_candle()).collect();

    let dropped = raw.len() - candles.len();
    if dropped > 0 {
        debug!(received = raw.len(), dropped, "dropped invalid candle records");
    }

    let inconsistent = candles.iter().filter(|c| !is_consistent(c)).count();
    if inconsistent > 0 {
        debug!(inconsistent, "kept candles with inconsistent OHLC or volume");
    }

    candles
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(time: i64, close: f64) -> RawCandle {
        RawCandle {
            time: Some(time),
            open: Some(close),
            high: Some(close + 1.0),
            low: Some(close - 1.0),
            close: Some(close),
            volume: Some(1_000.0),
        }
    }

    #[test]
    fn empty_input_gives_empty_series() {
        assert!(validate(&[]).is_empty());
    }

    #[test]
    fn complete_records_pass_through() {
        let series = validate(&[raw(0, 100.0), raw(60, 101.0)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[1].close, 101.0);
        assert_eq!(series[1].time, 60);
    }

    #[test]
    fn records_missing_any_field_are_dropped() {
        let mut records = Vec::new();
        for i in 0..6 {
            let mut r = raw(i * 60, 100.0);
            match i {
                0 => r.time = None,
                1 => r.open = None,
                2 => r.high = None,
                3 => r.low = None,
                4 => r.close = None,
                _ => r.volume = None,
            }
            records.push(r);
        }
        records.push(raw(999, 100.0));

        let series = validate(&records);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].time, 999);
    }

    #[test]
    fn non_finite_values_are_dropped() {
        let mut nan_close = raw(0, 100.0);
        nan_close.close = Some(f64::NAN);
        let mut inf_volume = raw(60, 100.0);
        inf_volume.volume = Some(f64::INFINITY);

        assert!(validate(&[nan_close, inf_volume]).is_empty());
    }

    #[test]
    fn inconsistent_bars_are_kept_as_delivered() {
        let mut open_above_high = raw(0, 100.0);
        open_above_high.open = Some(101.5);
        let mut negative_volume = raw(60, 100.0);
        negative_volume.volume = Some(-1.0);
        let mut zero_price = raw(120, 100.0);
        zero_price.low = Some(0.0);

        let series = validate(&[open_above_high, negative_volume, zero_price]);
        assert_eq!(series.len(), 3);
        assert_eq!(series[0].open, 101.5);
        assert_eq!(series[0].high, 101.0);
        assert!(!is_consistent(&series[0]));
        assert!(!is_consistent(&series[1]));
        assert!(!is_consistent(&series[2]));
        assert!(is_consistent(&raw(180, 100.0).into_candle().unwrap()));
    }

    #[test]
    fn zero_volume_is_kept() {
        let mut r = raw(0, 100.0);
        r.volume = Some(0.0);
        assert_eq!(validate(&[r]).len(), 1);
    }

    #[test]
    fn out_of_order_and_duplicates_are_not_resorted() {
        let series = validate(&[raw(120, 3.0), raw(60, 2.0), raw(60, 2.5)]);
        let times: Vec<i64> = series.iter().map(|c| c.time).collect();
        assert_eq!(times, vec![120, 60, 60]);
    }

    #[test]
    fn input_is_not_mutated() {
        let records = vec![raw(0, 100.0), RawCandle::default()];
        let before = records.clone();
        let _ = validate(&records);
        assert_eq!(records, before);
    }
}
