// =============================================================================
// Relative Strength Index (RSI) — simple rolling means
// =============================================================================
//
// Step 1 — Per-bar price change. The first bar has no predecessor and its
//          change counts as 0, so the first full window ends at index
//          `period - 1`.
// Step 2 — gain = max(change, 0), loss = max(-change, 0).
// Step 3 — avg_gain / avg_loss = simple mean over the trailing `period` bars.
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// This is the SMA (Cutler) variant, not Wilder's smoothing. A window whose
// average loss is exactly zero has no defined RSI and yields `None`.
// =============================================================================

/// Compute the RSI for every index of `closes`.
///
/// The output has one entry per close; entries before index `period - 1`
/// and entries whose average loss is zero are `None`.
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; closes.len()];
    if period == 0 || closes.len() < period {
        return result;
    }

    let mut gains = Vec::with_capacity(closes.len());
    let mut losses = Vec::with_capacity(closes.len());
    gains.push(0.0);
    losses.push(0.0);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    let period_f = period as f64;
    for end in (period - 1)..closes.len() {
        let start = end + 1 - period;
        // Sum each window from scratch so a run of zero losses is exactly 0.
        let avg_gain = gains[start..=end].iter().sum::<f64>() / period_f;
        let avg_loss = losses[start..=end].iter().sum::<f64>() / period_f;
        result[end] = rsi_from_averages(avg_gain, avg_loss);
    }

    result
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Returns `None` when the average loss is zero (RS is undefined) or the
/// result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return None;
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
