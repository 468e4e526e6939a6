// =============================================================================
// Binance REST API Client — public kline history
// =============================================================================
//
// Only the unauthenticated market-data endpoint is used:
//   GET /api/v3/klines?symbol=..&interval=..&startTime=..&endTime=..&limit=1000
//
// One request returns at most 1 000 klines, so a month of 5m bars (~8 600) is
// fetched page by page, advancing `startTime` past the last open time.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::Url;
use tracing::{debug, instrument, warn};

use crate::market_data::{Bar, BarProvider, FetchRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Maximum klines Binance returns per request.
const KLINES_PAGE_LIMIT: usize = 1000;

/// Upper bound on pages per fetch (one month of 5m bars needs 9).
const MAX_PAGES: usize = 20;

/// Binance REST API client for public kline history.
#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
}

impl BinanceClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a new `BinanceClient` against `base_url` with a per-request
    /// timeout.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .context("failed to build reqwest client for Binance")?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        debug!(base_url = %base_url, "BinanceClient initialised");

        Ok(Self { base_url, client })
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// Query values are form-encoded, so the symbol reaches Binance verbatim.
    fn klines_url(&self, symbol: &str, interval: &str, start_ms: i64, end_ms: i64) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/api/v3/klines", self.base_url))
            .with_context(|| format!("invalid Binance base URL '{}'", self.base_url))?;
        url.query_pairs_mut()
            .append_pair("symbol", symbol)
            .append_pair("interval", interval)
            .append_pair("startTime", &start_ms.to_string())
            .append_pair("endTime", &end_ms.to_string())
            .append_pair("limit", &KLINES_PAGE_LIMIT.to_string());
        Ok(url)
    }

    /// GET /api/v3/klines for one page starting at `start_ms`.
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<Bar>> {
        let url = self.klines_url(symbol, interval, start_ms, end_ms)?;

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse klines response")?;

        if !status.is_success() {
            anyhow::bail!(
                "Binance GET /api/v3/klines returned {}: {}",
                status,
                body
            );
        }

        let bars = parse_klines(&body)?;
        debug!(symbol, interval, count = bars.len(), "klines fetched");
        Ok(bars)
    }
}

#[async_trait]
impl BarProvider for BinanceClient {
    fn name(&self) -> &'static str {
        "binance"
    }

    async fn fetch_bars(&self, request: &FetchRequest) -> Result<Vec<Bar>> {
        let symbol = request.symbol.to_uppercase();
        let interval = request.interval.as_str();
        let end_ms = request.end.timestamp_millis();
        let mut start_ms = request.start.timestamp_millis();

        let mut bars: Vec<Bar> = Vec::new();
        for _ in 0..MAX_PAGES {
            let page = self.get_klines(&symbol, interval, start_ms, end_ms).await?;
            let page_len = page.len();
            let Some(last) = page.last() else {
                break;
            };
            start_ms = last.timestamp.timestamp_millis() + request.interval.duration_ms();
            bars.extend(page);

            if page_len < KLINES_PAGE_LIMIT || start_ms > end_ms {
                return Ok(bars);
            }
        }

        if start_ms <= end_ms && !bars.is_empty() {
            warn!(symbol = %symbol, pages = MAX_PAGES, "kline pagination stopped at page cap");
        }
        Ok(bars)
    }
}

// -----------------------------------------------------------------------------
// Internal helpers
// -----------------------------------------------------------------------------

/// Parse Binance's array-of-arrays kline payload.
///
/// Array indices:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
///   [6] closeTime, ...
fn parse_klines(body: &serde_json::Value) -> Result<Vec<Bar>> {
    let raw = body
        .as_array()
        .context("klines response is not an array")?;

    let mut bars = Vec::with_capacity(raw.len());

    for entry in raw {
        let arr = entry
            .as_array()
            .context("kline entry is not an array")?;

        if arr.len() < 6 {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let open_time = arr[0].as_i64().context("kline open time is not an integer")?;
        let timestamp = Utc
            .timestamp_millis_opt(open_time)
            .single()
            .with_context(|| format!("kline open time {open_time} out of range"))?;
        let open = parse_str_f64(&arr[1])?;
        let high = parse_str_f64(&arr[2])?;
        let low = parse_str_f64(&arr[3])?;
        let close = parse_str_f64(&arr[4])?;
        let volume = parse_str_f64(&arr[5])?;

        bars.push(Bar::new(timestamp, open, high, low, close, Some(volume)));
    }

    Ok(bars)
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}
