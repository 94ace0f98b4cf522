// =============================================================================
// Yahoo chart envelope — typed schema
// =============================================================================
//
// Expected shape (every level optional, every array entry nullable):
// ```json
// { "chart": { "result": [ {
//     "timestamp": [1700000000, ...],
//     "indicators": { "quote": [ {
//         "open": [..], "high": [..], "low": [..], "close": [..], "volume": [..]
//     } ] }
// } ], "error": null } }
// ```
// A missing result or quote block yields zero records, not an error. Gaps are
// carried as `None` and filtered later by the candle series validator.
// =============================================================================

use serde::Deserialize;

use crate::market_data::candle_series::RawCandle;

#[derive(Debug, Default, Deserialize)]
pub struct ChartResponse {
    #[serde(default)]
    pub chart: Option<Chart>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Chart {
    #[serde(default)]
    pub result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub timestamp: Option<Vec<Option<i64>>>,
    #[serde(default)]
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Option<Vec<QuoteSeries>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteSeries {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Zip timestamps with the first quote block into raw records, one per
    /// timestamp. Arrays shorter than `timestamp` leave the tail fields empty.
    pub fn into_raw_candles(self) -> Vec<RawCandle> {
        let Some(result) = self
            .chart
            .and_then(|c| c.result)
            .and_then(|r| r.into_iter().next())
        else {
            return Vec::new();
        };

        let Some(quote) = result
            .indicators
            .and_then(|i| i.quote)
            .and_then(|q| q.into_iter().next())
        else {
            return Vec::new();
        };

        let at = |series: &[Option<f64>], i: usize| series.get(i).copied().flatten();

        result
            .timestamp
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, time)| RawCandle {
                time,
                open: at(&quote.open, i),
                high: at(&quote.high, i),
                low: at(&quote.low, i),
                close: at(&quote.close, i),
                volume: at(&quote.volume, i),
            })
            .collect()
    }
}

/// Parse a chart payload from JSON text.
#[cfg(test)]
fn parse_chart(text: &str) -> serde_json::Result<Vec<RawCandle>> {
    let response: ChartResponse = serde_json::from_str(text)?;
    Ok(response.into_raw_candles())
}
