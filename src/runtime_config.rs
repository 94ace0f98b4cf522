// =============================================================================
// Runtime Configuration — upstream source and analysis policy
// =============================================================================
//
// Loaded once at startup from a JSON file. All fields carry
// `#[serde(default)]` so a partial (or empty) file is valid and missing keys
// take the built-in values.
//
// RSI settings are deliberately absent: they arrive per request and always
// fall back to the fixed defaults in `settings.rs`.
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::engine::AnalysisParams;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_symbol() -> String {
    "^NSEI".to_string()
}

fn default_chart_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_interval() -> String {
    "1m".to_string()
}

fn default_range() -> String {
    "1d".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; NiftyAI/1.0)".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

// =============================================================================
// RuntimeConfig
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Instrument to chart, in the upstream's notation (e.g. "^NSEI").
    #[serde(default = "default_symbol")]
    pub symbol: String,

    /// Scheme + host of the chart API, without a trailing slash.
    #[serde(default = "default_chart_base_url")]
    pub chart_base_url: String,

    /// Bar interval requested from upstream.
    #[serde(default = "default_interval")]
    pub interval: String,

    /// History window requested from upstream.
    #[serde(default = "default_range")]
    pub range: String,

    /// Include pre/post-market bars.
    #[serde(default)]
    pub include_pre_post: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Upstream HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Opening window, level fractions and proximity tolerance.
    #[serde(default)]
    pub analysis: AnalysisParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbol: default_symbol(),
            chart_base_url: default_chart_base_url(),
            interval: default_interval(),
            range: default_range(),
            include_pre_post: false,
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
            analysis: AnalysisParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning. Analysis parameters are normalised on
    /// load.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let mut config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;
        config.analysis = config.analysis.normalized();

        info!(
            path = %path.display(),
            symbol = %config.symbol,
            interval = %config.interval,
            "runtime config loaded"
        );

        Ok(config)
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.symbol, "^NSEI");
        assert_eq!(cfg.interval, "1m");
        assert_eq!(cfg.range, "1d");
        assert!(!cfg.include_pre_post);
        assert_eq!(cfg.request_timeout_secs, 10);
        assert_eq!(cfg.analysis.opening_window_secs, 300);
        assert!((cfg.analysis.near_fraction - 0.382).abs() < f64::EPSILON);
        assert!((cfg.analysis.far_fraction - 0.618).abs() < f64::EPSILON);
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.symbol, "^NSEI");
        assert_eq!(cfg.chart_base_url, "https://query1.finance.yahoo.com");
        assert_eq!(cfg.analysis, AnalysisParams::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "symbol": "^NSEBANK", "analysis": { "opening_window_secs": 900 } }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.symbol, "^NSEBANK");
        assert_eq!(cfg.analysis.opening_window_secs, 900);
        assert!((cfg.analysis.proximity_tolerance - 0.001).abs() < f64::EPSILON);
        assert_eq!(cfg.interval, "1m");
    }

    #[test]
    fn load_normalises_analysis_params() {
        let path = std::env::temp_dir().join(format!(
            "confluence_config_test_{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{ "analysis": { "near_fraction": 0.9, "far_fraction": 0.1 } }"#,
        )
        .unwrap();

        let cfg = RuntimeConfig::load(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert!((cfg.analysis.near_fraction - 0.382).abs() < f64::EPSILON);
        assert!((cfg.analysis.far_fraction - 0.618).abs() < f64::EPSILON);
    }

    #[test]
    fn load_missing_file_is_an_error() {
        assert!(RuntimeConfig::load("/definitely/not/here/confluence.json").is_err());
    }
}
