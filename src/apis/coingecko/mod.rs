/// CoinGecko API client
///
/// API Documentation: https://docs.coingecko.com/reference/introduction
///
/// Endpoints implemented:
/// 1. /simple/price?ids={id}&vs_currencies={currency} - Spot price of the reference asset

pub mod types;

use self::types::SimplePriceResponse;
use crate::apis::client::HttpClient;
use crate::config::PricingConfig;
use crate::core::{ MetricsError, MetricsResult };

pub struct CoinGeckoClient {
    http_client: HttpClient,
    base_url: String,
    asset_id: String,
    vs_currency: String,
}

impl CoinGeckoClient {
    pub fn new(pricing: &PricingConfig, timeout_secs: u64) -> MetricsResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout_secs)?,
            base_url: pricing.coingecko_url.clone(),
            asset_id: pricing.reference_asset_id.clone(),
            vs_currency: pricing.reference_vs_currency.clone(),
        })
    }

    /// Fetch the reference asset's fiat price
    ///
    /// This is a required input to the pricing pipeline: every failure mode
    /// (transport, non-OK status, missing field) maps to `PriceUnavailable`
    /// and propagates. There is no fallback source.
    pub async fn get_reference_usd_price(&self) -> MetricsResult<f64> {
        let url = format!(
            "{}/simple/price?ids={}&vs_currencies={}",
            self.base_url,
            self.asset_id,
            self.vs_currency
        );

        log::debug!("Fetching {}/{} price from CoinGecko", self.asset_id, self.vs_currency);

        let response = self.http_client
            .client()
            .get(&url)
            .header("Accept", "application/json")
            .send().await
            .map_err(|e| MetricsError::PriceUnavailable(format!("CoinGecko request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                MetricsError::PriceUnavailable(
                    format!("CoinGecko returned status: {}", response.status())
                )
            );
        }

        let prices: SimplePriceResponse = response
            .json().await
            .map_err(|e| MetricsError::PriceUnavailable(format!("Invalid CoinGecko response: {}", e)))?;

        extract_price(&prices, &self.asset_id, &self.vs_currency)
    }
}

/// Pull one quote out of the /simple/price map
fn extract_price(
    prices: &SimplePriceResponse,
    asset_id: &str,
    vs_currency: &str
) -> MetricsResult<f64> {
    prices
        .get(asset_id)
        .and_then(|quotes| quotes.get(vs_currency))
        .copied()
        .ok_or_else(|| {
            MetricsError::PriceUnavailable(
                format!("CoinGecko response has no {}/{} quote", asset_id, vs_currency)
            )
        })
}
