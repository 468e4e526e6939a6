// =============================================================================
// Fibonacci retracement
// =============================================================================
//
// A single level over the most recent swing:
//   level = swing_high - ratio * (swing_high - swing_low)
// where the swing is the max high / min low of the trailing `lookback` bars
// (all bars when fewer are available).

/// Golden-ratio retracement used on the dashboard.
pub const FIB_RATIO: f64 = 0.618;

/// Bars considered when locating the swing.
pub const SWING_LOOKBACK: usize = 50;

/// Retracement level of `ratio` over the trailing `lookback` highs/lows.
///
/// Returns `None` when either slice is empty or `lookback == 0`.
pub fn retracement_level(highs: &[f64], lows: &[f64], lookback: usize, ratio: f64) -> Option<f64> {
    if lookback == 0 {
        return None;
    }
    let swing_high = trailing(highs, lookback).iter().copied().reduce(f64::max)?;
    let swing_low = trailing(lows, lookback).iter().copied().reduce(f64::min)?;

    Some(swing_high - ratio * (swing_high - swing_low))
}

fn trailing(xs: &[f64], n: usize) -> &[f64] {
    &xs[xs.len().saturating_sub(n)..]
}
