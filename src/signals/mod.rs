// =============================================================================
// Signals Module
// =============================================================================
//
// Rule-based event detection over candles, levels and RSI.

pub mod confluence;

pub use confluence::analyze_confluence;
