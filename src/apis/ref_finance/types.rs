use serde::Deserialize;
use std::collections::HashMap;

/// One entry of the /list-token-price map
///
/// Older indexer deployments return the price as a bare numeric string,
/// newer ones wrap it in an object. Both shapes must be accepted.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TokenPriceEntry {
    Plain(String),
    Detailed {
        price: String,
    },
}

impl TokenPriceEntry {
    /// Parsed USD price, or None when the value is non-numeric or not
    /// strictly positive (either means "not tradeable yet")
    pub fn price_usd(&self) -> Option<f64> {
        let text = match self {
            TokenPriceEntry::Plain(price) => price,
            TokenPriceEntry::Detailed { price } => price,
        };

        text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|price| price.is_finite() && *price > 0.0)
    }
}

/// Full indexer listing: contract address -> price entry
pub type TokenPriceMap = HashMap<String, TokenPriceEntry>;
