// =============================================================================
// RSI Settings — total, idempotent normalisation of request parameters
// =============================================================================
//
// Every field is validated independently. Anything missing, non-finite or out
// of range falls back to that field's default; window lengths above the cap
// are clamped to it. Normalising an already-normalised value is a no-op.
// =============================================================================

use serde::{Deserialize, Serialize};

const DEFAULT_PERIOD: usize = 14;
const DEFAULT_SMOOTHING: usize = 14;
const DEFAULT_OVERBOUGHT: f64 = 70.0;
const DEFAULT_OVERSOLD: f64 = 30.0;

/// Upper bound for both `period` and `smoothing`.
pub const MAX_WINDOW: usize = 50;

/// Effective RSI configuration. Construct through [`RsiSettings::normalize`]
/// (or `Default`) so the invariants below always hold:
///
/// - `2 <= period <= 50`
/// - `1 <= smoothing <= 50`
/// - `0 < oversold < 100`, `0 < overbought < 100`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RsiSettings {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
    pub smoothing: usize,
}

impl Default for RsiSettings {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            overbought: DEFAULT_OVERBOUGHT,
            oversold: DEFAULT_OVERSOLD,
            smoothing: DEFAULT_SMOOTHING,
        }
    }
}

/// Loosely-typed settings as they arrive from a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct RawRsiSettings {
    pub period: Option<f64>,
    pub overbought: Option<f64>,
    pub oversold: Option<f64>,
    pub smoothing: Option<f64>,
}

impl RawRsiSettings {
    /// Build from query-string text. Text that does not parse as a number is
    /// treated as NaN so it falls back to the default, never errors.
    pub fn from_strs(
        period: Option<&str>,
        overbought: Option<&str>,
        oversold: Option<&str>,
        smoothing: Option<&str>,
    ) -> Self {
        fn num(s: Option<&str>) -> Option<f64> {
            s.map(|s| s.trim().parse::<f64>().unwrap_or(f64::NAN))
        }
        Self {
            period: num(period),
            overbought: num(overbought),
            oversold: num(oversold),
            smoothing: num(smoothing),
        }
    }
}

impl From<RsiSettings> for RawRsiSettings {
    fn from(s: RsiSettings) -> Self {
        Self {
            period: Some(s.period as f64),
            overbought: Some(s.overbought),
            oversold: Some(s.oversold),
            smoothing: Some(s.smoothing as f64),
        }
    }
}

impl RsiSettings {
    /// Map any raw input onto valid settings. Fractional windows are floored
    /// before range checks.
    pub fn normalize(raw: RawRsiSettings) -> Self {
        let defaults = Self::default();
        Self {
            period: window(raw.period, 2).unwrap_or(defaults.period),
            overbought: threshold(raw.overbought).unwrap_or(defaults.overbought),
            oversold: threshold(raw.oversold).unwrap_or(defaults.oversold),
            smoothing: window(raw.smoothing, 1).unwrap_or(defaults.smoothing),
        }
    }
}

fn window(raw: Option<f64>, min: usize) -> Option<usize> {
    let v = raw?.floor();
    if !v.is_finite() || v < min as f64 {
        return None;
    }
    Some((v.min(MAX_WINDOW as f64)) as usize)
}

fn threshold(raw: Option<f64>) -> Option<f64> {
    raw.filter(|v| v.is_finite() && *v > 0.0 && *v < 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(period: f64, overbought: f64, oversold: f64, smoothing: f64) -> RawRsiSettings {
        RawRsiSettings {
            period: Some(period),
            overbought: Some(overbought),
            oversold: Some(oversold),
            smoothing: Some(smoothing),
        }
    }

    #[test]
    fn missing_fields_use_defaults() {
        assert_eq!(RsiSettings::normalize(RawRsiSettings::default()), RsiSettings::default());
    }

    #[test]
    fn valid_values_pass_through() {
        let s = RsiSettings::normalize(raw(5.0, 80.0, 20.0, 3.0));
        assert_eq!(s.period, 5);
        assert_eq!(s.smoothing, 3);
        assert_eq!(s.overbought, 80.0);
        assert_eq!(s.oversold, 20.0);
    }

    #[test]
    fn windows_clamp_to_fifty() {
        let s = RsiSettings::normalize(raw(500.0, 70.0, 30.0, 51.0));
        assert_eq!(s.period, MAX_WINDOW);
        assert_eq!(s.smoothing, MAX_WINDOW);
    }

    #[test]
    fn out_of_range_falls_back() {
        let s = RsiSettings::normalize(raw(1.0, 100.0, 0.0, 0.0));
        assert_eq!(s, RsiSettings::default());

        let s = RsiSettings::normalize(raw(f64::NAN, f64::INFINITY, -5.0, f64::NEG_INFINITY));
        assert_eq!(s, RsiSettings::default());
    }

    #[test]
    fn fractional_period_is_floored() {
        assert_eq!(RsiSettings::normalize(raw(14.9, 70.0, 30.0, 1.5)).period, 14);
        assert_eq!(RsiSettings::normalize(raw(14.9, 70.0, 30.0, 1.5)).smoothing, 1);
        // 1.5 floors to 1, below the minimum period of 2.
        assert_eq!(RsiSettings::normalize(raw(1.5, 70.0, 30.0, 14.0)).period, 14);
    }

    #[test]
    fn smoothing_of_one_is_allowed() {
        assert_eq!(RsiSettings::normalize(raw(14.0, 70.0, 30.0, 1.0)).smoothing, 1);
    }

    #[test]
    fn normalize_is_idempotent() {
        let inputs = [
            RawRsiSettings::default(),
            raw(5.0, 80.0, 20.0, 3.0),
            raw(500.0, 150.0, -1.0, 0.5),
            raw(f64::NAN, 99.99, 0.01, 49.7),
            raw(2.0, 1.0, 99.0, 1.0),
        ];
        for input in inputs {
            let once = RsiSettings::normalize(input);
            let twice = RsiSettings::normalize(once.into());
            assert_eq!(once, twice, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn query_text_parses_like_number() {
        let r = RawRsiSettings::from_strs(Some(" 7 "), Some("abc"), None, Some(""));
        assert_eq!(r.period, Some(7.0));
        assert!(r.overbought.unwrap().is_nan());
        assert_eq!(r.oversold, None);
        let s = RsiSettings::normalize(r);
        assert_eq!(s.period, 7);
        assert_eq!(s.overbought, 70.0);
        assert_eq!(s.smoothing, 14);
    }
}
