// =============================================================================
// Shared types used across the Friday scan pipeline
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Bar interval offered by the timeframe selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    /// Every selectable interval, in the order shown on the dashboard.
    pub const ALL: [Interval; 4] = [
        Interval::FiveMinutes,
        Interval::FifteenMinutes,
        Interval::OneHour,
        Interval::OneDay,
    ];

    /// The literal wire form (`"5m"`, `"15m"`, `"1h"`, `"1d"`).
    ///
    /// Both Yahoo and Binance accept these strings unchanged.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::OneHour => "1h",
            Self::OneDay => "1d",
        }
    }

    /// Length of one bar in milliseconds.
    pub fn duration_ms(&self) -> i64 {
        match self {
            Self::FiveMinutes => 5 * 60_000,
            Self::FifteenMinutes => 15 * 60_000,
            Self::OneHour => 60 * 60_000,
            Self::OneDay => 24 * 60 * 60_000,
        }
    }
}

impl Default for Interval {
    fn default() -> Self {
        Self::FifteenMinutes
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "5m" => Ok(Self::FiveMinutes),
            "15m" => Ok(Self::FifteenMinutes),
            "1h" => Ok(Self::OneHour),
            "1d" => Ok(Self::OneDay),
            other => anyhow::bail!("unsupported timeframe '{other}' (expected 5m, 15m, 1h or 1d)"),
        }
    }
}

/// Price position relative to the long-window trend line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrendLabel {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "BULLISH"),
            Self::Bearish => write!(f, "BEARISH"),
            Self::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Which upstream market-data source the scan pulls bars from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Yahoo,
    Binance,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Yahoo
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Yahoo => write!(f, "yahoo"),
            Self::Binance => write!(f, "binance"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "binance" => Ok(Self::Binance),
            other => anyhow::bail!("unknown data provider '{other}'"),
        }
    }
}
