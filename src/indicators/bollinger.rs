// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ), evaluated at every bar over a trailing
// window. σ is the *sample* standard deviation (n - 1 denominator).

/// One bar's band values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub middle: f64,
    pub std_dev: f64,
    pub upper: f64,
    pub lower: f64,
}

/// Rolling Bollinger Bands for `closes`.
///
/// One entry per close; entries before index `period - 1` are `None`.
/// `period` must be at least 2 for a sample deviation to exist; smaller
/// periods yield all `None`.
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Vec<Option<BollingerPoint>> {
    let mut result = vec![None; closes.len()];
    if period < 2 || closes.len() < period {
        return result;
    }

    let n = period as f64;
    for (i, window) in closes.windows(period).enumerate() {
        let middle = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / (n - 1.0);
        let std_dev = variance.sqrt();

        result[i + period - 1] = Some(BollingerPoint {
            middle,
            std_dev,
            upper: middle + num_std * std_dev,
            lower: middle - num_std * std_dev,
        });
    }

    result
}
