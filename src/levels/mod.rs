// =============================================================================
// Opening-range levels
// =============================================================================
//
// The opening window's high/low band and the support/resistance levels
// projected from it. Both stages are pure functions of the candle series.

pub mod opening_range;
pub mod projection;

pub use opening_range::{first_range, OPENING_WINDOW_SECS};
pub use projection::{build_levels, LevelFractions};
