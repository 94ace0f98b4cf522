// =============================================================================
// Shared types used across the confluence engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single validated OHLCV bar. `time` is seconds since the UNIX epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// High/low band of the opening window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningRange {
    pub high: f64,
    pub low: f64,
}

/// A named support or resistance price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub value: f64,
}

/// Which side of the opening range a level sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelSide {
    Resistance,
    Support,
}

/// Support and resistance levels projected from an [`OpeningRange`].
///
/// Both sequences are ordered nearest-to-price first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedLevels {
    pub support: Vec<Level>,
    pub resistance: Vec<Level>,
    pub mid: f64,
    pub span: f64,
}

impl EnrichedLevels {
    /// Iterate every level tagged with its side, resistance first.
    pub fn iter(&self) -> impl Iterator<Item = (LevelSide, &Level)> {
        self.resistance
            .iter()
            .map(|l| (LevelSide::Resistance, l))
            .chain(self.support.iter().map(|l| (LevelSide::Support, l)))
    }
}

/// Categorical kind of a confluence event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    ResistanceRejection,
    SupportBounce,
}

impl SignalKind {
    pub fn for_side(side: LevelSide) -> Self {
        match side {
            LevelSide::Resistance => Self::ResistanceRejection,
            LevelSide::Support => Self::SupportBounce,
        }
    }
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResistanceRejection => write!(f, "resistance-rejection"),
            Self::SupportBounce => write!(f, "support-bounce"),
        }
    }
}

/// A moment where price sits on a level and RSI confirms the move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceSignal {
    #[serde(rename = "type")]
    pub kind: SignalKind,
    pub level: Level,
    pub candle: Candle,
    pub message: String,
}
