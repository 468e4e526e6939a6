// =============================================================================
// Chart descriptor
// =============================================================================
//
// Renderer-agnostic description of the dashboard chart: one candlestick
// series plus named line overlays. Times are UNIX seconds, which is what the
// browser charting library on the dashboard page consumes.
// =============================================================================

use serde::Serialize;

use crate::indicators::EnrichedSeries;

pub const TREND_OVERLAY_NAME: &str = "EMA_200";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandlePoint {
    pub time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// A line point; `value` is `null` where the indicator is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePoint {
    pub time: i64,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub points: Vec<LinePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescriptor {
    pub candles: Vec<CandlePoint>,
    pub overlays: Vec<LineSeries>,
}

impl ChartDescriptor {
    /// Candles for every bar with the trend line overlaid.
    pub fn from_enriched(enriched: &EnrichedSeries) -> Self {
        let mut candles = Vec::with_capacity(enriched.rows().len());
        let mut trend = Vec::with_capacity(enriched.rows().len());

        for (bar, row) in enriched.iter() {
            let time = bar.timestamp.timestamp();
            candles.push(CandlePoint {
                time,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
            });
            trend.push(LinePoint {
                time,
                value: row.ema_200,
            });
        }

        Self {
            candles,
            overlays: vec![LineSeries {
                name: TREND_OVERLAY_NAME.to_string(),
                points: trend,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::enrich;
    use crate::market_data::bar::tests::series_from_closes;

    #[test]
    fn descriptor_covers_every_bar() {
        let enriched = enrich(series_from_closes(&[10.0, 11.0, 12.0, 11.5]));
        let chart = ChartDescriptor::from_enriched(&enriched);

        assert_eq!(chart.candles.len(), 4);
        assert_eq!(chart.overlays.len(), 1);
        assert_eq!(chart.overlays[0].name, "EMA_200");
        assert_eq!(chart.overlays[0].points.len(), 4);
        assert_eq!(chart.candles[3].close, 11.5);
        assert_eq!(chart.candles[0].time, chart.overlays[0].points[0].time);
    }

    #[test]
    fn descriptor_times_are_ascending_seconds() {
        let enriched = enrich(series_from_closes(&[10.0, 11.0, 12.0]));
        let chart = ChartDescriptor::from_enriched(&enriched);
        assert_eq!(chart.candles[0].time, 1_700_000_000);
        assert!(chart.candles.windows(2).all(|w| w[0].time < w[1].time));
    }

    #[test]
    fn descriptor_serialises_to_json() {
        let enriched = enrich(series_from_closes(&[10.0]));
        let json = serde_json::to_value(ChartDescriptor::from_enriched(&enriched)).unwrap();
        assert_eq!(json["candles"][0]["open"], 10.0);
        assert_eq!(json["overlays"][0]["points"][0]["value"], 10.0);
    }
}
