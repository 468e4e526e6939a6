// =============================================================================
// Classification & Summary
// =============================================================================
//
// Reduces an enriched series to the three scalars shown on the dashboard:
// latest price, latest oscillator value and the trend label derived from
// price vs. the 200-span EMA.
// =============================================================================

use serde::Serialize;

use crate::indicators::EnrichedSeries;
use crate::types::TrendLabel;

/// Placeholder shown for an unavailable value.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub latest_price: Option<f64>,
    pub latest_oscillator: Option<f64>,
    pub latest_trend_line: Option<f64>,
    pub trend: TrendLabel,
}

/// A labelled, pre-formatted value for the metrics row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metric {
    pub label: &'static str,
    pub value: String,
}

/// BULLISH above the trend line, BEARISH at or below it, NEUTRAL when either
/// side is unavailable.
pub fn classify_trend(price: Option<f64>, trend_line: Option<f64>) -> TrendLabel {
    match (price, trend_line) {
        (Some(p), Some(t)) if p.is_finite() && t.is_finite() => {
            if p > t {
                TrendLabel::Bullish
            } else {
                TrendLabel::Bearish
            }
        }
        _ => TrendLabel::Neutral,
    }
}

/// Summarise the last row of `enriched`.
pub fn summarize(enriched: &EnrichedSeries) -> Summary {
    let (bar, row) = enriched.last();
    let latest_price = Some(bar.close).filter(|p| p.is_finite());
    let latest_oscillator = row.rsi_14.filter(|v| v.is_finite());
    let latest_trend_line = row.ema_200.filter(|v| v.is_finite());

    Summary {
        latest_price,
        latest_oscillator,
        latest_trend_line,
        trend: classify_trend(latest_price, latest_trend_line),
    }
}

impl Summary {
    /// The metrics row: price, oscillator, trend.
    pub fn metrics(&self, currency_symbol: &str) -> [Metric; 3] {
        [
            Metric {
                label: "Current Price",
                value: format_price(self.latest_price, currency_symbol),
            },
            Metric {
                label: "RSI (Momentum)",
                value: format_oscillator(self.latest_oscillator),
            },
            Metric {
                label: "Trend (EMA 200)",
                value: self.trend.to_string(),
            },
        ]
    }
}

pub fn format_price(price: Option<f64>, currency_symbol: &str) -> String {
    match price {
        Some(p) => format!("{currency_symbol}{p:.2}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_oscillator(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::enrich;
    use crate::market_data::bar::tests::series_from_closes;

    #[test]
    fn classify_above_trend_is_bullish() {
        assert_eq!(classify_trend(Some(101.0), Some(100.0)), TrendLabel::Bullish);
    }

    #[test]
    fn classify_below_or_equal_trend_is_bearish() {
        assert_eq!(classify_trend(Some(99.0), Some(100.0)), TrendLabel::Bearish);
        assert_eq!(classify_trend(Some(100.0), Some(100.0)), TrendLabel::Bearish);
    }

    #[test]
    fn classify_missing_value_is_neutral() {
        assert_eq!(classify_trend(None, Some(100.0)), TrendLabel::Neutral);
        assert_eq!(classify_trend(Some(100.0), None), TrendLabel::Neutral);
        assert_eq!(classify_trend(Some(f64::NAN), Some(100.0)), TrendLabel::Neutral);
    }

    #[test]
    fn three_rising_bars_compare_price_to_ema() {
        // The EMA is seeded at bar 1 so it exists; it lags a rising close.
        let summary = summarize(&enrich(series_from_closes(&[10.0, 11.0, 12.0])));
        assert_eq!(summary.latest_price, Some(12.0));
        assert!(summary.latest_oscillator.is_none());
        let ema = summary.latest_trend_line.unwrap();
        let expected = if ema > 12.0 { TrendLabel::Bearish } else { TrendLabel::Bullish };
        assert_eq!(summary.trend, expected);
        assert_eq!(summary.trend, TrendLabel::Bullish);
    }

    #[test]
    fn flat_series_is_bearish_with_missing_oscillator() {
        let summary = summarize(&enrich(series_from_closes(&[100.0; 25])));
        assert!(summary.latest_oscillator.is_none());
        assert_eq!(summary.trend, TrendLabel::Bearish);
    }

    #[test]
    fn metrics_formatting() {
        let summary = Summary {
            latest_price: Some(2412.0),
            latest_oscillator: Some(55.54),
            latest_trend_line: Some(2400.0),
            trend: TrendLabel::Bullish,
        };
        let [price, rsi, trend] = summary.metrics("₹");
        assert_eq!(price.label, "Current Price");
        assert_eq!(price.value, "₹2412.00");
        assert_eq!(rsi.value, "55.5");
        assert_eq!(trend.value, "BULLISH");
    }

    #[test]
    fn metrics_render_missing_as_na() {
        let summary = Summary {
            latest_price: None,
            latest_oscillator: None,
            latest_trend_line: None,
            trend: TrendLabel::Neutral,
        };
        let [price, rsi, trend] = summary.metrics("$");
        assert_eq!(price.value, "N/A");
        assert_eq!(rsi.value, "N/A");
        assert_eq!(trend.value, "NEUTRAL");
    }
}
