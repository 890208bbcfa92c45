//! Pricing pipeline: DEX price discovery plus the NEAR/USD reference price
//!
//! Each indexer backend implements the DexPriceSource trait to provide a
//! standardized interface; the active backend is selected by configuration.

use std::sync::Arc;

use crate::apis::coingecko::CoinGeckoClient;
use crate::apis::dexscreener::DexScreenerClient;
use crate::apis::ref_finance::RefFinanceClient;
use crate::config::Config;
use crate::core::{ MetricsError, MetricsResult };

/// DEX quote for the token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DexPrice {
    /// Price in USD
    pub price_usd: f64,
    /// Price denominated in the reference asset (0 when the ratio could
    /// not be computed)
    pub price_near: f64,
}

/// Combined pricing snapshot consumed by the aggregator
#[derive(Debug, Clone)]
pub struct PriceData {
    pub price_usd: Option<f64>,
    pub price_near: Option<f64>,
    /// Always populated; a failure fetching it fails the whole lookup
    pub near_usd: f64,
}

/// Standard interface for DEX price backends
#[async_trait::async_trait]
pub trait DexPriceSource: Send + Sync {
    /// Short identifier reported in response metadata
    fn name(&self) -> &'static str;

    /// Current DEX quote, or None when the token is not listed yet
    async fn fetch_price(&self) -> MetricsResult<Option<DexPrice>>;
}

/// Build the configured DEX price backend
pub fn build_dex_source(config: &Config) -> MetricsResult<Arc<dyn DexPriceSource>> {
    match config.pricing.dex_source.as_str() {
        "ref_finance" => Ok(Arc::new(RefFinanceClient::new(config)?)),
        "dexscreener" => Ok(Arc::new(DexScreenerClient::new(config)?)),
        other => Err(MetricsError::Config(format!("Unknown dex_source: {}", other))),
    }
}

pub struct PriceReader {
    dex: Arc<dyn DexPriceSource>,
    coingecko: CoinGeckoClient,
}

impl PriceReader {
    pub fn new(dex: Arc<dyn DexPriceSource>, coingecko: CoinGeckoClient) -> Self {
        Self { dex, coingecko }
    }

    pub fn source_name(&self) -> &'static str {
        self.dex.name()
    }

    /// Fetch the full pricing snapshot
    ///
    /// The DEX quote and the reference price are fetched concurrently. A
    /// missing DEX listing degrades to null prices; a reference-price
    /// failure propagates as `PriceUnavailable`.
    pub async fn get_price_data(&self) -> MetricsResult<PriceData> {
        let (dex_price, near_usd) = tokio::join!(
            self.dex_price_or_none(),
            self.coingecko.get_reference_usd_price()
        );

        let near_usd = near_usd?;

        Ok(match dex_price {
            Some(price) =>
                PriceData {
                    price_usd: Some(price.price_usd),
                    price_near: Some(price.price_near),
                    near_usd,
                },
            None =>
                PriceData {
                    price_usd: None,
                    price_near: None,
                    near_usd,
                },
        })
    }

    /// 24h trading volume in USD
    ///
    /// No upstream currently exposes this; aggregators track volume on
    /// their side until an indexer with swap analytics is wired in.
    pub async fn get_volume_24h_usd(&self) -> Option<f64> {
        None
    }

    /// DEX lookup with local degradation: a pre-listing state is an
    /// ordinary outcome and transport/parse failures are absorbed the
    /// same way, never propagated
    async fn dex_price_or_none(&self) -> Option<DexPrice> {
        match self.dex.fetch_price().await {
            Ok(Some(price)) => Some(price),
            Ok(None) => {
                log::info!("Token not yet listed on {}", self.dex.name());
                None
            }
            Err(e) => {
                log::warn!("Failed to fetch DEX price from {}: {}", self.dex.name(), e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::coingecko::CoinGeckoClient;

    struct StaticSource(MetricsResult<Option<DexPrice>>);

    #[async_trait::async_trait]
    impl DexPriceSource for StaticSource {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn fetch_price(&self) -> MetricsResult<Option<DexPrice>> {
            match &self.0 {
                Ok(price) => Ok(*price),
                Err(e) => Err(MetricsError::Network(e.to_string())),
            }
        }
    }

    fn reader(result: MetricsResult<Option<DexPrice>>) -> PriceReader {
        let config = Config::default();
        let coingecko = CoinGeckoClient::new(&config.pricing, config.http_timeout_secs).unwrap();
        PriceReader::new(Arc::new(StaticSource(result)), coingecko)
    }

    #[tokio::test]
    async fn backend_errors_degrade_to_absent_price() {
        let reader = reader(Err(MetricsError::Network("indexer down".to_string())));
        assert_eq!(reader.dex_price_or_none().await, None);
    }

    #[tokio::test]
    async fn unlisted_token_is_not_an_error() {
        let reader = reader(Ok(None));
        assert_eq!(reader.dex_price_or_none().await, None);
    }

    #[tokio::test]
    async fn listed_quote_passes_through() {
        let quote = DexPrice { price_usd: 0.05, price_near: 0.02 };
        let reader = reader(Ok(Some(quote)));
        assert_eq!(reader.dex_price_or_none().await, Some(quote));
    }

    #[test]
    fn source_selection_follows_config() {
        let mut config = Config::default();
        assert_eq!(build_dex_source(&config).unwrap().name(), "ref_finance");

        config.pricing.dex_source = "dexscreener".to_string();
        assert_eq!(build_dex_source(&config).unwrap().name(), "dexscreener");

        config.pricing.dex_source = "jupiter".to_string();
        assert!(build_dex_source(&config).is_err());
    }
}
