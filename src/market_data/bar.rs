use anyhow::{ensure, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLC bar as delivered by a market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
}

impl Bar {
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// All four prices are finite and strictly positive.
    pub fn has_valid_prices(&self) -> bool {
        [self.open, self.high, self.low, self.close]
            .iter()
            .all(|p| p.is_finite() && *p > 0.0)
    }
}

// ---------------------------------------------------------------------------
// Series -- non-empty, strictly time-ordered bars
// ---------------------------------------------------------------------------

/// Time-ordered bars, most recent last.
///
/// A `Series` can never be empty and its timestamps are strictly increasing;
/// both are checked on construction, so downstream stages may index the last
/// bar without a guard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Build a series from bars that are already in order.
    ///
    /// Fails on an empty input, on out-of-order or duplicate timestamps, and
    /// on any non-positive or non-finite price.
    pub fn new(bars: Vec<Bar>) -> Result<Self> {
        ensure!(!bars.is_empty(), "series must contain at least one bar");

        for (i, bar) in bars.iter().enumerate() {
            ensure!(
                bar.has_valid_prices(),
                "bar {i} at {} has a non-positive or non-finite price",
                bar.timestamp
            );
        }
        for (i, pair) in bars.windows(2).enumerate() {
            ensure!(
                pair[0].timestamp < pair[1].timestamp,
                "bar {} at {} is not after bar {i} at {}",
                i + 1,
                pair[1].timestamp,
                pair[0].timestamp
            );
        }

        Ok(Self { bars })
    }

    /// Normalise raw provider output and build a series from it.
    ///
    /// Bars with invalid prices are dropped, the rest are sorted by timestamp
    /// and duplicate timestamps collapse to the last bar seen. Returns `None`
    /// when nothing usable remains.
    pub fn from_raw(mut bars: Vec<Bar>) -> Option<Self> {
        let raw_len = bars.len();
        bars.retain(Bar::has_valid_prices);
        // Stable sort keeps provider order among equal timestamps, so the
        // dedup below retains the latest revision of a bar.
        bars.sort_by_key(|b| b.timestamp);

        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        if deduped.len() != raw_len {
            debug!(raw = raw_len, kept = deduped.len(), "normalised provider bars");
        }

        Self::new(deduped).ok()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Most recent bar. Always present.
    pub fn last(&self) -> &Bar {
        // Non-empty is a construction invariant.
        &self.bars[self.bars.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.low).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
