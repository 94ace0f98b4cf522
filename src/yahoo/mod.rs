// =============================================================================
// Upstream market data (Yahoo Finance chart API)
// =============================================================================

pub mod chart;
pub mod client;

pub use client::{ChartClient, UpstreamStatus};
