// =============================================================================
// Acquisition boundary
// =============================================================================
//
// `BarProvider` is the seam to any upstream market-data source. `fetch` wraps
// a provider call so that no error crosses into the rest of the pipeline:
// every failure becomes a `FetchOutcome` variant, and callers that only care
// about "data or no data" use `FetchOutcome::into_series`. The failure reason
// is carried for logging.
// =============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

use crate::market_data::bar::{Bar, Series};
use crate::types::Interval;

/// Default history window: one calendar month.
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;

/// One acquisition request, resolved to an absolute time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub symbol: String,
    pub interval: Interval,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchRequest {
    /// Request covering `[now - lookback, now]`.
    pub fn trailing(symbol: impl Into<String>, interval: Interval, lookback: Duration) -> Self {
        let end = Utc::now();
        Self {
            symbol: symbol.into(),
            interval,
            start: end - lookback,
            end,
        }
    }
}

#[async_trait]
pub trait BarProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Retrieve raw bars for the request. Order and duplicates are not
    /// guaranteed; [`fetch`] normalises them.
    async fn fetch_bars(&self, request: &FetchRequest) -> anyhow::Result<Vec<Bar>>;
}

/// Tagged result of an acquisition attempt.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// At least one usable bar, ascending by timestamp.
    Bars(Series),
    /// The provider answered but nothing usable came back.
    NoData,
    /// Network, HTTP, provider or parse failure.
    Failed { reason: String },
}

impl FetchOutcome {
    /// Collapse both failure variants into `None`.
    pub fn into_series(self) -> Option<Series> {
        match self {
            Self::Bars(series) => Some(series),
            Self::NoData | Self::Failed { .. } => None,
        }
    }
}

/// Single-attempt fetch of `symbol` at `interval` over the trailing
/// `lookback` window. Never returns an error.
pub async fn fetch(
    provider: &dyn BarProvider,
    symbol: &str,
    interval: Interval,
    lookback: Duration,
) -> FetchOutcome {
    let symbol = symbol.trim();
    if symbol.is_empty() {
        warn!(provider = provider.name(), "fetch skipped: empty symbol");
        return FetchOutcome::Failed {
            reason: "symbol is empty".to_string(),
        };
    }

    let request = FetchRequest::trailing(symbol, interval, lookback);

    match provider.fetch_bars(&request).await {
        Ok(raw) => match Series::from_raw(raw) {
            Some(series) => {
                info!(
                    provider = provider.name(),
                    symbol = %request.symbol,
                    interval = %interval,
                    bars = series.len(),
                    "bars fetched"
                );
                FetchOutcome::Bars(series)
            }
            None => {
                warn!(
                    provider = provider.name(),
                    symbol = %request.symbol,
                    interval = %interval,
                    "provider returned no usable bars"
                );
                FetchOutcome::NoData
            }
        },
        Err(e) => {
            let reason = format!("{e:#}");
            warn!(
                provider = provider.name(),
                symbol = %request.symbol,
                interval = %interval,
                error = %reason,
                "bar fetch failed"
            );
            FetchOutcome::Failed { reason }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::market_data::bar::tests::sample_bar;

    /// In-memory provider returning a fixed result.
    pub(crate) struct StaticProvider {
        pub bars: Vec<Bar>,
        pub fail: bool,
    }

    impl StaticProvider {
        pub(crate) fn with_closes(closes: &[f64]) -> Self {
            Self {
                bars: closes
                    .iter()
                    .enumerate()
                    .map(|(i, &c)| sample_bar(i as i64, c))
                    .collect(),
                fail: false,
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                bars: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl BarProvider for StaticProvider {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch_bars(&self, _request: &FetchRequest) -> anyhow::Result<Vec<Bar>> {
            if self.fail {
                anyhow::bail!("simulated network failure");
            }
            Ok(self.bars.clone())
        }
    }

    fn month() -> Duration {
        Duration::days(DEFAULT_LOOKBACK_DAYS)
    }

    #[test]
    fn trailing_request_spans_lookback() {
        let req = FetchRequest::trailing("RELIANCE.NS", Interval::OneDay, Duration::days(30));
        assert_eq!(req.end - req.start, Duration::days(30));
        assert_eq!(req.symbol, "RELIANCE.NS");
    }

    #[tokio::test]
    async fn fetch_success_yields_series() {
        let provider = StaticProvider::with_closes(&[10.0, 11.0, 12.0]);
        let outcome = fetch(&provider, "TEST", Interval::FifteenMinutes, month()).await;
        assert_eq!(outcome.into_series().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn fetch_error_is_swallowed() {
        let provider = StaticProvider::failing();
        let outcome = fetch(&provider, "TEST", Interval::FifteenMinutes, month()).await;
        match &outcome {
            FetchOutcome::Failed { reason } => assert!(reason.contains("simulated")),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert!(outcome.into_series().is_none());
    }

    #[tokio::test]
    async fn fetch_zero_bars_is_no_data() {
        let provider = StaticProvider::with_closes(&[]);
        let outcome = fetch(&provider, "TEST", Interval::OneHour, month()).await;
        assert!(matches!(outcome, FetchOutcome::NoData));
        assert!(outcome.into_series().is_none());
    }

    #[tokio::test]
    async fn fetch_blank_symbol_fails_without_calling_provider() {
        let provider = StaticProvider::with_closes(&[10.0]);
        let outcome = fetch(&provider, "   ", Interval::OneHour, month()).await;
        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    }
}
