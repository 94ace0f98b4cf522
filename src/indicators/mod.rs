// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free indicator implementations. Insufficient data yields
// an empty series rather than an error.

pub mod rsi;
