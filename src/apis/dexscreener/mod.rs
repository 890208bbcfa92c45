/// DexScreener API client, alternate DEX price backend
///
/// API Documentation: https://docs.dexscreener.com/api/reference
///
/// Endpoints implemented:
/// 1. /latest/dex/tokens/{address} - All pool pairs for a token across chains

pub mod types;

use self::types::{ TokenPair, TokenPairsResponse };
use crate::apis::client::HttpClient;
use crate::config::Config;
use crate::core::{ MetricsError, MetricsResult };
use crate::pricing::{ DexPrice, DexPriceSource };

/// DexScreener chain identifier for NEAR pools
const NEAR_CHAIN_ID: &str = "near";

pub struct DexScreenerClient {
    http_client: HttpClient,
    base_url: String,
    token_contract: String,
    wrapped_reference: String,
}

impl DexScreenerClient {
    pub fn new(config: &Config) -> MetricsResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(config.http_timeout_secs)?,
            base_url: config.pricing.dexscreener_url.clone(),
            token_contract: config.token.contract.clone(),
            wrapped_reference: config.pricing.wrapped_reference_contract.clone(),
        })
    }

    async fn fetch_token_pairs(&self) -> MetricsResult<Vec<TokenPair>> {
        let url = format!("{}/latest/dex/tokens/{}", self.base_url, self.token_contract);

        log::debug!("Fetching token pairs from DexScreener: {}", url);

        let response = self.http_client
            .client()
            .get(&url)
            .header("Accept", "application/json")
            .send().await
            .map_err(|e| MetricsError::Network(format!("DexScreener request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                MetricsError::Network(
                    format!("DexScreener returned status: {}", response.status())
                )
            );
        }

        let parsed: TokenPairsResponse = response
            .json().await
            .map_err(|e| MetricsError::Parse(format!("Invalid DexScreener response: {}", e)))?;

        Ok(parsed.pairs.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl DexPriceSource for DexScreenerClient {
    fn name(&self) -> &'static str {
        "dexscreener"
    }

    async fn fetch_price(&self) -> MetricsResult<Option<DexPrice>> {
        let pairs = self.fetch_token_pairs().await?;
        Ok(resolve_pair_price(&pairs, &self.token_contract, &self.wrapped_reference))
    }
}

/// Pick the deepest NEAR-chain pool for the token and read its prices
///
/// `priceNative` is the token price in the pool's quote asset, so it only
/// doubles as the NEAR ratio when the pool is quoted in the wrapped
/// reference asset; otherwise the ratio stays at 0 like the default
/// backend's missing-reference case.
fn resolve_pair_price(
    pairs: &[TokenPair],
    token_contract: &str,
    wrapped_reference: &str
) -> Option<DexPrice> {
    let pair = pairs
        .iter()
        .filter(|pair| {
            pair.chain_id == NEAR_CHAIN_ID && pair.base_token.address == token_contract
        })
        .max_by(|a, b| {
            let left = a.liquidity.as_ref().map(|l| l.usd).unwrap_or(0.0);
            let right = b.liquidity.as_ref().map(|l| l.usd).unwrap_or(0.0);
            left.total_cmp(&right)
        })?;

    let price_usd = pair.price_usd
        .as_deref()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)?;

    let price_near = if pair.quote_token.address == wrapped_reference {
        pair.price_native
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price > 0.0)
            .unwrap_or(0.0)
    } else {
        0.0
    };

    Some(DexPrice { price_usd, price_near })
}
