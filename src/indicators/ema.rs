// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   alpha  = 2 / (span + 1)
//   EMA_0  = close_0
//   EMA_t  = EMA_{t-1} + alpha * (close_t - EMA_{t-1})
//
// Seeding from the first close (rather than an SMA of the first `span`
// values) means the line is defined from the very first bar, with no warm-up
// gap. This is the recursive, non-adjusted form.
// =============================================================================

/// Compute the EMA series for `values` with smoothing `span`.
///
/// The output has exactly one value per input. Returns an empty `Vec` for an
/// empty input or `span == 0`.
pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    let Some(&first) = values.first() else {
        return Vec::new();
    };
    if span == 0 {
        return Vec::new();
    }

    let alpha = 2.0 / (span as f64 + 1.0);

    let mut result = Vec::with_capacity(values.len());
    let mut prev = first;
    result.push(prev);
    for &value in &values[1..] {
        prev += alpha * (value - prev);
        result.push(prev);
    }

    result
}
