/// Shared application state for the webserver
///
/// Holds the frozen configuration and the constructed readers. All request
/// work is request-scoped: nothing here is mutated after startup.
use std::sync::Arc;

use crate::apis::coingecko::CoinGeckoClient;
use crate::chain::{ NearRpcClient, SupplyReader };
use crate::config::Config;
use crate::core::MetricsResult;
use crate::metrics::TokenMetricsService;
use crate::pricing::{ self, PriceReader };

pub struct AppState {
    pub config: Arc<Config>,
    pub supply_reader: Arc<SupplyReader>,
    pub metrics: Arc<TokenMetricsService>,
}

impl AppState {
    /// Wire the readers together from configuration
    pub fn new(config: Config) -> MetricsResult<Self> {
        let config = Arc::new(config);

        let rpc = NearRpcClient::new(&config.rpc_url, config.http_timeout_secs)?;
        let supply_reader = Arc::new(SupplyReader::new(rpc, config.token.clone()));

        let dex_source = pricing::build_dex_source(&config)?;
        let coingecko = CoinGeckoClient::new(&config.pricing, config.http_timeout_secs)?;
        let price_reader = Arc::new(PriceReader::new(dex_source, coingecko));

        let metrics = Arc::new(
            TokenMetricsService::new(Arc::clone(&supply_reader), price_reader, &config.token)
        );

        Ok(Self {
            config,
            supply_reader,
            metrics,
        })
    }
}
