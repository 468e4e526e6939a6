// =============================================================================
// Candle Pattern Detection — hammer
// =============================================================================
//
// A hammer has a small real body and a long lower wick:
//   body         = |close - open|
//   lower_shadow = open - low   (bullish bar, close > open)
//                = close - low  (otherwise)
//   hammer       = lower_shadow > 2 * body
//
// The comparison is literal: a doji (body == 0) with any lower wick counts.
// =============================================================================

use serde::Serialize;

use crate::market_data::{Bar, Series};

/// Body and lower-wick measurements of one candle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandleShape {
    pub body: f64,
    pub lower_shadow: f64,
}

impl CandleShape {
    pub fn of(bar: &Bar) -> Self {
        let body = (bar.close - bar.open).abs();
        let lower_shadow = if bar.close > bar.open {
            bar.open - bar.low
        } else {
            bar.close - bar.low
        };
        Self { body, lower_shadow }
    }

    pub fn is_hammer(&self) -> bool {
        self.lower_shadow > 2.0 * self.body
    }
}

/// Whether the most recent bar of `series` is hammer-like.
pub fn detect_hammer(series: &Series) -> bool {
    CandleShape::of(series.last()).is_hammer()
}
