/// Ref Finance indexer client
///
/// Endpoints implemented:
/// 1. /list-token-price - USD prices for every listed token, keyed by contract

pub mod types;

use self::types::TokenPriceMap;
use crate::apis::client::HttpClient;
use crate::config::Config;
use crate::core::{ MetricsError, MetricsResult };
use crate::pricing::{ DexPrice, DexPriceSource };

pub struct RefFinanceClient {
    http_client: HttpClient,
    base_url: String,
    token_contract: String,
    wrapped_reference: String,
}

impl RefFinanceClient {
    pub fn new(config: &Config) -> MetricsResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(config.http_timeout_secs)?,
            base_url: config.pricing.ref_finance_url.clone(),
            token_contract: config.token.contract.clone(),
            wrapped_reference: config.pricing.wrapped_reference_contract.clone(),
        })
    }

    async fn fetch_price_map(&self) -> MetricsResult<TokenPriceMap> {
        let url = format!("{}/list-token-price", self.base_url);

        log::debug!("Fetching token price listing from Ref Finance: {}", url);

        let response = self.http_client
            .client()
            .get(&url)
            .header("Accept", "application/json")
            .send().await
            .map_err(|e| MetricsError::Network(format!("Ref Finance request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                MetricsError::Network(
                    format!("Ref Finance returned status: {}", response.status())
                )
            );
        }

        response
            .json().await
            .map_err(|e| MetricsError::Parse(format!("Invalid Ref Finance response: {}", e)))
    }
}

#[async_trait::async_trait]
impl DexPriceSource for RefFinanceClient {
    fn name(&self) -> &'static str {
        "ref_finance"
    }

    async fn fetch_price(&self) -> MetricsResult<Option<DexPrice>> {
        let prices = self.fetch_price_map().await?;
        Ok(resolve_dex_price(&prices, &self.token_contract, &self.wrapped_reference))
    }
}

/// Look the token up in the indexer listing
///
/// An absent, non-numeric or non-positive entry means "not listed yet".
/// The reference-asset ratio is best effort: it defaults to 0 when the
/// wrapped reference entry is missing or non-positive.
fn resolve_dex_price(
    prices: &TokenPriceMap,
    token_contract: &str,
    wrapped_reference: &str
) -> Option<DexPrice> {
    let price_usd = prices.get(token_contract)?.price_usd()?;

    let price_near = prices
        .get(wrapped_reference)
        .and_then(|entry| entry.price_usd())
        .map(|reference_usd| price_usd / reference_usd)
        .unwrap_or(0.0);

    Some(DexPrice { price_usd, price_near })
}
