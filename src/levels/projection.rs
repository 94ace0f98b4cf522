// =============================================================================
// Level Builder
// =============================================================================
//
//   mid  = (high + low) / 2
//   span = high - low
//   R1 = high + span * near     R2 = high + span * far
//   S1 = low  - span * near     S2 = low  - span * far
//
// With 0 < near < far the ordering R1 < R2 and S1 > S2 holds whenever
// span > 0. A flat range (span = 0) collapses R1 = R2 = high and
// S1 = S2 = low; nothing is divided, so every value stays finite.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::{EnrichedLevels, Level, OpeningRange};

const DEFAULT_NEAR: f64 = 0.382;
const DEFAULT_FAR: f64 = 0.618;

/// Span multiples for the near (R1/S1) and far (R2/S2) levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelFractions {
    pub near: f64,
    pub far: f64,
}

impl Default for LevelFractions {
    fn default() -> Self {
        Self {
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
        }
    }
}

impl LevelFractions {
    /// Returns `self` when `0 < near < far` (both finite), otherwise the
    /// default pair.
    pub fn normalized(self) -> Self {
        let valid = self.near.is_finite()
            && self.far.is_finite()
            && self.near > 0.0
            && self.near < self.far;
        if valid {
            self
        } else {
            Self::default()
        }
    }
}

/// Project support/resistance from the opening range. `None` in, `None` out.
pub fn build_levels(range: Option<&OpeningRange>, fractions: LevelFractions) -> Option<EnrichedLevels> {
    let range = range?;
    let fractions = fractions.normalized();

    let span = (range.high - range.low).max(0.0);
    let mid = (range.high + range.low) / 2.0;

    let level = |name: &str, value: f64| Level {
        name: name.to_string(),
        value,
    };

    Some(EnrichedLevels {
        resistance: vec![
            level("R1", range.high + span * fractions.near),
            level("R2", range.high + span * fractions.far),
        ],
        support: vec![
            level("S1", range.low - span * fractions.near),
            level("S2", range.low - span * fractions.far),
        ],
        mid,
        span,
    })
}
