// =============================================================================
// Scan pipeline — fetch → enrich → detect → summarize → chart
// =============================================================================
//
// One call runs the whole pipeline to completion and builds either the
// dashboard payload or the single error notice. Nothing is kept between
// scans.
// =============================================================================

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::chart::ChartDescriptor;
use crate::indicators::enrich;
use crate::market_data::{fetch, BarProvider, FetchOutcome};
use crate::patterns::detect_hammer;
use crate::runtime_config::RuntimeConfig;
use crate::summary::{summarize, Metric, Summary};
use crate::types::Interval;

pub const FETCH_FAILED_NOTICE: &str = "Data fetch failed. Please check symbol.";

/// Dashboard form input. Missing fields take the configured defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScanRequest {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub timeframe: Option<Interval>,
    #[serde(default)]
    pub risk_per_trade: Option<f64>,
}

/// A request with defaults applied and values checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanParams {
    pub symbol: String,
    pub timeframe: Interval,
    pub risk_per_trade: f64,
}

impl ScanRequest {
    pub fn resolve(self, config: &RuntimeConfig) -> Result<ScanParams> {
        // Only a missing field takes the default; a blank one is passed on and
        // rejected at fetch time.
        let symbol = self
            .symbol
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| config.default_symbol.clone());
        let risk_per_trade = self.risk_per_trade.unwrap_or(config.default_risk_per_trade);

        ensure!(
            risk_per_trade.is_finite() && risk_per_trade >= 0.0,
            "risk_per_trade must be a non-negative number, got {risk_per_trade}"
        );

        Ok(ScanParams {
            symbol,
            timeframe: self.timeframe.unwrap_or(config.default_timeframe),
            risk_per_trade,
        })
    }
}

/// Outcome of one scan, as sent to the dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanReport {
    #[serde(rename = "ok")]
    Dashboard(Box<Dashboard>),
    Failed { notice: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub symbol: String,
    pub timeframe: Interval,
    pub bar_count: usize,
    pub metrics: [Metric; 3],
    pub summary: Summary,
    pub hammer: bool,
    pub fib_618: f64,
    pub risk_per_trade: f64,
    pub chart: ChartDescriptor,
}

/// Run the full pipeline for `params`.
#[instrument(skip(provider, config), fields(provider = provider.name()))]
pub async fn run_scan(
    provider: &dyn BarProvider,
    config: &RuntimeConfig,
    params: ScanParams,
) -> ScanReport {
    let outcome = fetch(provider, &params.symbol, params.timeframe, config.lookback()).await;

    if let FetchOutcome::Failed { reason } = &outcome {
        warn!(symbol = %params.symbol, timeframe = %params.timeframe, reason = %reason, "scan aborted");
    }

    let Some(series) = outcome.into_series() else {
        return ScanReport::Failed {
            notice: FETCH_FAILED_NOTICE.to_string(),
        };
    };

    let enriched = enrich(series);
    let hammer = detect_hammer(enriched.series());
    let summary = summarize(&enriched);
    let chart = ChartDescriptor::from_enriched(&enriched);

    info!(
        symbol = %params.symbol,
        timeframe = %params.timeframe,
        bars = enriched.rows().len(),
        trend = %summary.trend,
        hammer,
        risk_per_trade = params.risk_per_trade,
        "scan complete"
    );

    ScanReport::Dashboard(Box::new(Dashboard {
        symbol: params.symbol,
        timeframe: params.timeframe,
        bar_count: enriched.rows().len(),
        metrics: summary.metrics(&config.currency_symbol),
        summary,
        hammer,
        fib_618: enriched.fib_618(),
        risk_per_trade: params.risk_per_trade,
        chart,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::provider::tests::StaticProvider;
    use crate::types::TrendLabel;

    fn params(symbol: &str) -> ScanParams {
        ScanParams {
            symbol: symbol.to_string(),
            timeframe: Interval::FifteenMinutes,
            risk_per_trade: 500.0,
        }
    }

    #[test]
    fn resolve_applies_defaults() {
        let cfg = RuntimeConfig::default();
        let p = ScanRequest::default().resolve(&cfg).unwrap();
        assert_eq!(p.symbol, "RELIANCE.NS");
        assert_eq!(p.timeframe, Interval::FifteenMinutes);
        assert_eq!(p.risk_per_trade, 500.0);
    }

    #[test]
    fn resolve_keeps_blank_symbol() {
        let cfg = RuntimeConfig::default();
        let req = ScanRequest {
            symbol: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(req.resolve(&cfg).unwrap().symbol, "");
    }

    #[test]
    fn resolve_trims_symbol() {
        let cfg = RuntimeConfig::default();
        let req = ScanRequest {
            symbol: Some("  TCS.NS ".into()),
            ..Default::default()
        };
        assert_eq!(req.resolve(&cfg).unwrap().symbol, "TCS.NS");
    }

    #[test]
    fn resolve_rejects_negative_risk() {
        let cfg = RuntimeConfig::default();
        let req = ScanRequest {
            risk_per_trade: Some(-1.0),
            ..Default::default()
        };
        assert!(req.resolve(&cfg).is_err());
    }

    #[tokio::test]
    async fn failed_fetch_yields_only_the_notice() {
        let provider = StaticProvider::failing();
        let report = run_scan(&provider, &RuntimeConfig::default(), params("NOPE")).await;
        match report {
            ScanReport::Failed { notice } => assert_eq!(notice, FETCH_FAILED_NOTICE),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn blank_symbol_yields_only_the_notice() {
        let provider = StaticProvider::with_closes(&[10.0, 11.0]);
        let cfg = RuntimeConfig::default();
        let req = ScanRequest {
            symbol: Some("   ".into()),
            ..Default::default()
        };
        let report = run_scan(&provider, &cfg, req.resolve(&cfg).unwrap()).await;
        match report {
            ScanReport::Failed { notice } => assert_eq!(notice, FETCH_FAILED_NOTICE),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_fetch_yields_only_the_notice() {
        let provider = StaticProvider::with_closes(&[]);
        let report = run_scan(&provider, &RuntimeConfig::default(), params("EMPTY")).await;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["notice"], FETCH_FAILED_NOTICE);
        assert!(json.get("metrics").is_none());
        assert!(json.get("chart").is_none());
    }

    #[tokio::test]
    async fn successful_scan_builds_dashboard() {
        let provider = StaticProvider::with_closes(&[10.0, 11.0, 12.0]);
        let report = run_scan(&provider, &RuntimeConfig::default(), params("TEST")).await;
        let ScanReport::Dashboard(dash) = report else {
            panic!("expected dashboard");
        };
        assert_eq!(dash.bar_count, 3);
        assert_eq!(dash.summary.trend, TrendLabel::Bullish);
        assert_eq!(dash.metrics[0].value, "₹12.00");
        assert_eq!(dash.metrics[1].value, "N/A");
        assert_eq!(dash.metrics[2].value, "BULLISH");
        assert_eq!(dash.chart.candles.len(), 3);
        assert_eq!(dash.risk_per_trade, 500.0);
    }

    #[tokio::test]
    async fn dashboard_serialises_with_ok_status() {
        let provider = StaticProvider::with_closes(&[100.0; 25]);
        let report = run_scan(&provider, &RuntimeConfig::default(), params("FLAT")).await;
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["timeframe"], "15m");
        assert_eq!(json["metrics"][1]["value"], "N/A");
        assert_eq!(json["summary"]["trend"], "BEARISH");
        assert!(json["summary"]["latest_oscillator"].is_null());
    }
}
