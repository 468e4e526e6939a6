// =============================================================================
// Runtime Configuration — dashboard defaults and provider settings
// =============================================================================
//
// Read once at start-up from a JSON file, then overridden by a handful of
// environment variables. All fields carry `#[serde(default)]` so a partial
// (or empty) file still loads.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::types::{Interval, ProviderKind};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_symbol() -> String {
    "RELIANCE.NS".to_string()
}

fn default_lookback_days() -> i64 {
    crate::market_data::provider::DEFAULT_LOOKBACK_DAYS
}

fn default_risk_per_trade() -> f64 {
    500.0
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_yahoo_base_url() -> String {
    crate::market_data::yahoo::DEFAULT_BASE_URL.to_string()
}

fn default_binance_base_url() -> String {
    crate::binance::client::DEFAULT_BASE_URL.to_string()
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Start-up configuration for the scan dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    // --- Server ---------------------------------------------------------------

    /// Address the HTTP dashboard listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    // --- Acquisition -----------------------------------------------------------

    /// Upstream bar source.
    #[serde(default)]
    pub provider: ProviderKind,

    /// History window fetched per scan, in calendar days.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_yahoo_base_url")]
    pub yahoo_base_url: String,

    #[serde(default = "default_binance_base_url")]
    pub binance_base_url: String,

    // --- Form defaults -------------------------------------------------------

    /// Pre-filled symbol input.
    #[serde(default = "default_symbol")]
    pub default_symbol: String,

    /// Pre-selected timeframe.
    #[serde(default)]
    pub default_timeframe: Interval,

    /// Pre-filled risk-per-trade input. Echoed back with each scan; no
    /// computation reads it.
    #[serde(default = "default_risk_per_trade")]
    pub default_risk_per_trade: f64,

    /// Prefix used when formatting prices and the risk label.
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            provider: ProviderKind::default(),
            lookback_days: default_lookback_days(),
            request_timeout_secs: default_request_timeout_secs(),
            yahoo_base_url: default_yahoo_base_url(),
            binance_base_url: default_binance_base_url(),
            default_symbol: default_symbol(),
            default_timeframe: Interval::default(),
            default_risk_per_trade: default_risk_per_trade(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            provider = %config.provider,
            default_symbol = %config.default_symbol,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// `main`). Unparseable values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("FRIDAY_BIND_ADDR").filter(|s| !s.trim().is_empty()) {
            self.bind_addr = addr.trim().to_string();
        }
        if let Some(raw) = lookup("FRIDAY_PROVIDER") {
            match raw.parse::<ProviderKind>() {
                Ok(kind) => self.provider = kind,
                Err(e) => warn!(error = %e, "ignoring FRIDAY_PROVIDER"),
            }
        }
        if let Some(symbol) = lookup("FRIDAY_DEFAULT_SYMBOL").filter(|s| !s.trim().is_empty()) {
            self.default_symbol = symbol.trim().to_string();
        }
    }

    /// Fetch window as a duration. Non-positive values fall back to the
    /// default month.
    pub fn lookback(&self) -> Duration {
        if self.lookback_days > 0 {
            Duration::days(self.lookback_days)
        } else {
            Duration::days(default_lookback_days())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_has_expected_values() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.provider, ProviderKind::Yahoo);
        assert_eq!(cfg.default_symbol, "RELIANCE.NS");
        assert_eq!(cfg.default_timeframe, Interval::FifteenMinutes);
        assert_eq!(cfg.lookback_days, 30);
        assert!((cfg.default_risk_per_trade - 500.0).abs() < f64::EPSILON);
        assert_eq!(cfg.currency_symbol, "₹");
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let cfg: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, RuntimeConfig::default());
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "provider": "binance", "default_symbol": "BTCUSDT", "default_timeframe": "1h" }"#;
        let cfg: RuntimeConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.provider, ProviderKind::Binance);
        assert_eq!(cfg.default_symbol, "BTCUSDT");
        assert_eq!(cfg.default_timeframe, Interval::OneHour);
        assert_eq!(cfg.bind_addr, "0.0.0.0:3001");
    }

    #[test]
    fn deserialise_rejects_unknown_timeframe() {
        let json = r#"{ "default_timeframe": "4h" }"#;
        assert!(serde_json::from_str::<RuntimeConfig>(json).is_err());
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(RuntimeConfig::load("/nonexistent/friday_config.json").is_err());
    }

    #[test]
    fn env_overrides_apply() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("FRIDAY_BIND_ADDR", "127.0.0.1:8080"),
            ("FRIDAY_PROVIDER", "binance"),
            ("FRIDAY_DEFAULT_SYMBOL", " ETHUSDT "),
        ]);
        let mut cfg = RuntimeConfig::default();
        cfg.apply_env(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080");
        assert_eq!(cfg.provider, ProviderKind::Binance);
        assert_eq!(cfg.default_symbol, "ETHUSDT");
    }

    #[test]
    fn bad_env_provider_is_ignored() {
        let mut cfg = RuntimeConfig::default();
        cfg.apply_env(|k| (k == "FRIDAY_PROVIDER").then(|| "polygon".to_string()));
        assert_eq!(cfg.provider, ProviderKind::Yahoo);
    }

    #[test]
    fn lookback_falls_back_on_non_positive() {
        let mut cfg = RuntimeConfig::default();
        cfg.lookback_days = 0;
        assert_eq!(cfg.lookback(), Duration::days(30));
        cfg.lookback_days = 7;
        assert_eq!(cfg.lookback(), Duration::days(7));
    }
}
