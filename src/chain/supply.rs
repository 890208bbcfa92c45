/// On-chain supply reader for the NPRO fungible token contract
use futures::future::join_all;
use num_bigint::BigInt;
use num_traits::{ Pow, ToPrimitive, Zero };
use serde::Serialize;

use crate::chain::rpc::NearRpcClient;
use crate::config::TokenConfig;
use crate::core::{ MetricsError, MetricsResult };

/// Supply snapshot computed from chain state
///
/// Whole-token counts truncate fractional dust; the raw strings keep the
/// exact yocto-denominated integers for consumers that need full precision.
#[derive(Debug, Clone, Serialize)]
pub struct SupplyData {
    pub total_supply: u64,
    pub circulating_supply: u64,
    pub max_supply: u64,
    pub total_supply_raw: String,
    pub circulating_supply_raw: String,
}

pub struct SupplyReader {
    rpc: NearRpcClient,
    token: TokenConfig,
}

impl SupplyReader {
    pub fn new(rpc: NearRpcClient, token: TokenConfig) -> Self {
        Self { rpc, token }
    }

    /// Fetch total, circulating and max supply
    ///
    /// The total-supply query is required and propagates its failure. The
    /// excluded-account balance queries degrade individually to zero, so an
    /// unreachable account never aborts the whole computation.
    pub async fn get_supplies(&self) -> MetricsResult<SupplyData> {
        let balance_futures = self.token.excluded_accounts
            .iter()
            .map(|account| self.balance_or_zero(account));

        let (total_raw, excluded) = tokio::join!(self.total_supply_raw(), join_all(balance_futures));

        let total_raw = total_raw?;
        let excluded_raw: BigInt = excluded.into_iter().sum();

        Ok(
            compute_supply_data(
                total_raw,
                excluded_raw,
                self.token.decimals,
                self.token.max_supply
            )
        )
    }

    async fn total_supply_raw(&self) -> MetricsResult<BigInt> {
        let value = self.rpc.call_view_method(
            &self.token.contract,
            "ft_total_supply",
            &serde_json::json!({})
        ).await?;

        parse_token_amount(&value)
    }

    async fn balance_raw(&self, account_id: &str) -> MetricsResult<BigInt> {
        let value = self.rpc.call_view_method(
            &self.token.contract,
            "ft_balance_of",
            &serde_json::json!({ "account_id": account_id })
        ).await?;

        parse_token_amount(&value)
    }

    /// Balance of one excluded account, degraded to zero on failure
    async fn balance_or_zero(&self, account_id: &str) -> BigInt {
        match self.balance_raw(account_id).await {
            Ok(balance) => balance,
            Err(e) => {
                log::warn!("Could not fetch balance for {}: {}", account_id, e);
                BigInt::zero()
            }
        }
    }
}

/// Parse a view-call result as a yocto amount
///
/// The fungible token standard returns amounts as JSON strings to survive
/// 128-bit values; anything else is a malformed payload.
fn parse_token_amount(value: &serde_json::Value) -> MetricsResult<BigInt> {
    let text = value
        .as_str()
        .ok_or_else(|| MetricsError::Parse(format!("Token amount is not a string: {}", value)))?;

    text
        .parse::<BigInt>()
        .map_err(|e| MetricsError::Parse(format!("Invalid token amount '{}': {}", text, e)))
}

/// Derive the supply snapshot from exact yocto-denominated integers
fn compute_supply_data(
    total_raw: BigInt,
    excluded_raw: BigInt,
    decimals: u32,
    max_supply: u64
) -> SupplyData {
    let circulating_raw = &total_raw - &excluded_raw;
    let denom: BigInt = Pow::pow(BigInt::from(10u32), decimals);

    SupplyData {
        total_supply: whole_tokens(&total_raw, &denom),
        circulating_supply: whole_tokens(&circulating_raw, &denom),
        max_supply,
        total_supply_raw: total_raw.to_string(),
        circulating_supply_raw: circulating_raw.to_string(),
    }
}

/// Integer division only: fractional dust is dropped, never rounded
fn whole_tokens(raw: &BigInt, denom: &BigInt) -> u64 {
    (raw / denom).to_u64().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yocto(text: &str) -> BigInt {
        text.parse().unwrap()
    }

    #[test]
    fn circulating_is_exact_total_minus_excluded() {
        // 5_000_000 tokens total, 1_250_000 excluded, at 24 decimals
        let total = yocto("5000000000000000000000000000000");
        let excluded = yocto("1250000000000000000000000000000");

        let data = compute_supply_data(total, excluded, 24, 10_000_000);

        assert_eq!(data.total_supply, 5_000_000);
        assert_eq!(data.circulating_supply, 3_750_000);
        assert_eq!(data.max_supply, 10_000_000);
        assert_eq!(data.total_supply_raw, "5000000000000000000000000000000");
        assert_eq!(data.circulating_supply_raw, "3750000000000000000000000000000");
    }

    #[test]
    fn whole_token_conversion_truncates_dust() {
        let total = yocto("1500000000000000000000050");

        let data = compute_supply_data(total, BigInt::zero(), 24, 10_000_000);

        assert_eq!(data.total_supply, 1);
        assert_eq!(data.total_supply_raw, "1500000000000000000000050");
    }

    #[test]
    fn raw_strings_survive_values_beyond_u64() {
        // 24-decimal supplies are far past u64::MAX in minimal units
        let total = yocto("9999999000000000000000000000001");
        let data = compute_supply_data(total, BigInt::zero(), 24, 10_000_000);

        assert_eq!(data.total_supply, 9_999_999);
        assert_eq!(data.circulating_supply_raw, "9999999000000000000000000000001");
    }

    #[test]
    fn zero_excluded_sum_leaves_supplies_equal() {
        let total = yocto("42000000000000000000000000");
        let data = compute_supply_data(total.clone(), BigInt::zero(), 24, 10_000_000);

        assert_eq!(data.total_supply, data.circulating_supply);
        assert_eq!(data.total_supply_raw, data.circulating_supply_raw);
    }

    #[test]
    fn parse_token_amount_requires_a_quoted_string() {
        let quoted = serde_json::Value::String("123456".to_string());
        assert_eq!(parse_token_amount(&quoted).unwrap(), yocto("123456"));

        let bare = serde_json::json!(123456);
        assert!(matches!(parse_token_amount(&bare), Err(MetricsError::Parse(_))));

        let garbage = serde_json::Value::String("12x3".to_string());
        assert!(matches!(parse_token_amount(&garbage), Err(MetricsError::Parse(_))));
    }
}
