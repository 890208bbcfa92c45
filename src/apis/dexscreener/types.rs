use serde::Deserialize;

/// Response of /latest/dex/tokens/{address}
///
/// `pairs` is null (not an empty array) when the token has no pools yet.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPairsResponse {
    pub pairs: Option<Vec<TokenPair>>,
}

/// Pool pair information from the DexScreener API
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    #[serde(rename = "chainId")]
    pub chain_id: String,
    #[serde(rename = "dexId")]
    pub dex_id: String,
    #[serde(rename = "baseToken")]
    pub base_token: PairToken,
    #[serde(rename = "quoteToken")]
    pub quote_token: PairToken,
    #[serde(rename = "priceNative")]
    pub price_native: String,
    #[serde(rename = "priceUsd")]
    pub price_usd: Option<String>,
    pub liquidity: Option<LiquidityStats>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PairToken {
    pub address: String,
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LiquidityStats {
    pub usd: f64,
    pub base: f64,
    pub quote: f64,
}
