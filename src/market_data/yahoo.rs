// =============================================================================
// Yahoo Finance chart API client
// =============================================================================
//
// Public, unauthenticated endpoint:
//   GET /v8/finance/chart/{symbol}?interval=15m&period1=<unix>&period2=<unix>
//
// The response carries parallel arrays (timestamp, open, high, low, close,
// volume) in which any element may be `null` for bars with no trades. Those
// rows are skipped. Yahoo rejects requests without a browser-like User-Agent.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Url;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::market_data::bar::Bar;
use crate::market_data::provider::{BarProvider, FetchRequest};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) friday-scan/1.0";

#[derive(Clone)]
pub struct YahooClient {
    base_url: String,
    client: reqwest::Client,
}

impl YahooClient {
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client for Yahoo")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "YahooClient initialised");

        Ok(Self { base_url, client })
    }

    /// The symbol is pushed as a single encoded path segment, so characters
    /// like `?`, `&` or `/` cannot alter the request.
    fn chart_url(&self, request: &FetchRequest) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .with_context(|| format!("invalid Yahoo base URL '{}'", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Yahoo base URL '{}' cannot carry a path", self.base_url))?
            .pop_if_empty()
            .extend(["v8", "finance", "chart"])
            .push(&request.symbol);
        url.query_pairs_mut()
            .append_pair("interval", request.interval.as_str())
            .append_pair("period1", &request.start.timestamp().to_string())
            .append_pair("period2", &request.end.timestamp().to_string())
            .append_pair("includePrePost", "false");
        Ok(url)
    }
}

#[async_trait]
impl BarProvider for YahooClient {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    #[instrument(skip(self, request), name = "yahoo::fetch_bars", fields(symbol = %request.symbol, interval = %request.interval))]
    async fn fetch_bars(&self, request: &FetchRequest) -> Result<Vec<Bar>> {
        let url = self.chart_url(request)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("GET /v8/finance/chart request failed")?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .context("failed to read chart response body")?;

        // Yahoo reports unknown symbols as 404 with a JSON error payload, so try
        // to surface that message before falling back to the status code.
        match parse_chart(&body) {
            Ok(bars) if status.is_success() => {
                debug!(count = bars.len(), "chart bars parsed");
                Ok(bars)
            }
            Ok(_) => anyhow::bail!("Yahoo chart API returned {status}"),
            Err(e) if status.is_success() => Err(e),
            Err(e) => Err(e.context(format!("Yahoo chart API returned {status}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Response model
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Parse a chart response body into bars, skipping rows with missing prices.
fn parse_chart(body: &str) -> Result<Vec<Bar>> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).context("failed to parse chart response")?;

    if let Some(err) = envelope.chart.error {
        anyhow::bail!("Yahoo chart error {}: {}", err.code, err.description);
    }

    let result = envelope
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .context("chart response has no result")?;

    // A symbol with no trades in the window comes back without quote arrays.
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(Vec::new());
    };

    let at = |col: &[Option<f64>], i: usize| col.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let (Some(open), Some(high), Some(low), Some(close)) = (
            at(&quote.open, i),
            at(&quote.high, i),
            at(&quote.low, i),
            at(&quote.close, i),
        ) else {
            continue;
        };
        let Some(timestamp) = Utc.timestamp_opt(ts, 0).single() else {
            continue;
        };
        bars.push(Bar::new(timestamp, open, high, low, close, at(&quote.volume, i)));
    }

    Ok(bars)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
