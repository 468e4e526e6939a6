// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators shown on the
// dashboard. Rolling indicators return one `Option` per input bar so the
// warm-up gap and undefined values stay aligned with the series.

pub mod bollinger;
pub mod ema;
pub mod engine;
pub mod fibonacci;
pub mod rsi;

pub use engine::{enrich, EnrichedSeries};
