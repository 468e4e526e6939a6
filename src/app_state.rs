// =============================================================================
// Application State
// =============================================================================
//
// Read-only after start-up: the loaded configuration and the market-data
// provider. Each scan builds its own series, so no locking is needed.
// =============================================================================

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::binance::BinanceClient;
use crate::market_data::{BarProvider, YahooClient};
use crate::runtime_config::RuntimeConfig;
use crate::types::ProviderKind;

pub struct AppState {
    pub config: RuntimeConfig,
    pub provider: Arc<dyn BarProvider>,
}

impl AppState {
    pub fn new(config: RuntimeConfig, provider: Arc<dyn BarProvider>) -> Self {
        Self { config, provider }
    }

    /// Build state with the provider selected in `config`.
    pub fn from_config(config: RuntimeConfig) -> Result<Self> {
        let provider: Arc<dyn BarProvider> = match config.provider {
            ProviderKind::Yahoo => Arc::new(YahooClient::new(
                config.yahoo_base_url.clone(),
                config.request_timeout_secs,
            )?),
            ProviderKind::Binance => Arc::new(BinanceClient::new(
                config.binance_base_url.clone(),
                config.request_timeout_secs,
            )?),
        };
        info!(provider = provider.name(), "market data provider ready");

        Ok(Self::new(config, provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_selects_provider() {
        let mut cfg = RuntimeConfig::default();
        assert_eq!(AppState::from_config(cfg.clone()).unwrap().provider.name(), "yahoo");

        cfg.provider = ProviderKind::Binance;
        assert_eq!(AppState::from_config(cfg).unwrap().provider.name(), "binance");
    }
}
