//! Token metrics aggregator
//!
//! Fans out to the supply and price readers, derives market capitalization
//! and fully diluted valuation, and assembles the aggregator-facing wire
//! record.

use chrono::{ DateTime, SecondsFormat, Utc };
use serde::Serialize;
use std::sync::Arc;

use crate::chain::{ SupplyData, SupplyReader };
use crate::config::TokenConfig;
use crate::core::MetricsResult;
use crate::pricing::{ PriceData, PriceReader };

/// Wire-facing response for the token metrics endpoint
///
/// Price-derived fields serialize as JSON null when unavailable; the
/// metadata block is omitted entirely unless requested.
#[derive(Debug, Clone, Serialize)]
pub struct TokenMetricsResponse {
    pub symbol: String,
    pub name: String,
    pub currency: String,
    pub price: Option<String>,
    pub market_cap: Option<String>,
    pub fully_diluted_valuation: Option<String>,
    pub volume_24h: Option<String>,
    pub circulating_supply: String,
    pub total_supply: String,
    pub max_supply: String,
    pub last_updated: String,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

/// Diagnostic metadata attached when ?meta=true
#[derive(Debug, Clone, Serialize)]
pub struct ResponseMeta {
    pub price_source: String,
    pub supply_source: String,
    pub near_usd_price: String,
    pub npro_near_price: String,
}

pub struct TokenMetricsService {
    supply_reader: Arc<SupplyReader>,
    price_reader: Arc<PriceReader>,
    symbol: String,
    name: String,
}

impl TokenMetricsService {
    pub fn new(
        supply_reader: Arc<SupplyReader>,
        price_reader: Arc<PriceReader>,
        token: &TokenConfig
    ) -> Self {
        Self {
            supply_reader,
            price_reader,
            symbol: token.symbol.clone(),
            name: token.name.clone(),
        }
    }

    /// Build the full metrics response
    ///
    /// The supply read and the reference price are both required: either
    /// failure aborts the request. A missing DEX listing has already been
    /// degraded to null prices inside the pricing pipeline.
    pub async fn build_response(&self, include_meta: bool) -> MetricsResult<TokenMetricsResponse> {
        let (supplies, price_data, volume_24h) = tokio::join!(
            self.supply_reader.get_supplies(),
            self.price_reader.get_price_data(),
            self.price_reader.get_volume_24h_usd()
        );

        let supplies = supplies?;
        let price_data = price_data?;

        Ok(
            assemble_response(
                &self.symbol,
                &self.name,
                self.price_reader.source_name(),
                &supplies,
                &price_data,
                volume_24h,
                include_meta,
                Utc::now()
            )
        )
    }
}

fn assemble_response(
    symbol: &str,
    name: &str,
    price_source: &str,
    supplies: &SupplyData,
    price_data: &PriceData,
    volume_24h: Option<f64>,
    include_meta: bool,
    now: DateTime<Utc>
) -> TokenMetricsResponse {
    let price_usd = price_data.price_usd;
    let market_cap = price_usd.map(|price| price * (supplies.circulating_supply as f64));
    let fdv = price_usd.map(|price| price * (supplies.total_supply as f64));

    let meta = if include_meta {
        Some(ResponseMeta {
            price_source: if price_usd.is_some() {
                price_source.to_string()
            } else {
                "unavailable".to_string()
            },
            supply_source: "near_blockchain".to_string(),
            near_usd_price: format!("{:.4}", price_data.near_usd),
            npro_near_price: price_data.price_near
                .map(|ratio| format!("{:.8}", ratio))
                .unwrap_or_else(|| "unavailable".to_string()),
        })
    } else {
        None
    };

    TokenMetricsResponse {
        symbol: symbol.to_string(),
        name: name.to_string(),
        currency: "USD".to_string(),
        price: price_usd.map(format_fiat),
        market_cap: market_cap.map(format_fiat),
        fully_diluted_valuation: fdv.map(format_fiat),
        volume_24h: volume_24h.map(format_fiat),
        circulating_supply: supplies.circulating_supply.to_string(),
        total_supply: supplies.total_supply.to_string(),
        max_supply: supplies.max_supply.to_string(),
        last_updated: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        meta,
    }
}

/// Fiat formatting used by aggregator listings: sub-unit values keep 8
/// fractional digits, everything else gets currency-grade 2
fn format_fiat(value: f64) -> String {
    if value < 1.0 {
        format!("{:.8}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn supplies() -> SupplyData {
        SupplyData {
            total_supply: 5_000_000,
            circulating_supply: 3_750_000,
            max_supply: 10_000_000,
            total_supply_raw: "5000000000000000000000000000000".to_string(),
            circulating_supply_raw: "3750000000000000000000000000000".to_string(),
        }
    }

    fn listed_prices() -> PriceData {
        PriceData {
            price_usd: Some(0.05),
            price_near: Some(0.02),
            near_usd: 2.5,
        }
    }

    fn unlisted_prices() -> PriceData {
        PriceData {
            price_usd: None,
            price_near: None,
            near_usd: 2.5,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 6, 12, 0, 0).unwrap()
    }

    #[test]
    fn fiat_formatting_switches_precision_at_one() {
        assert_eq!(format_fiat(0.0000001234), "0.00000012");
        assert_eq!(format_fiat(1234.5), "1234.50");
        assert_eq!(format_fiat(0.999999999), "1.00000000");
        assert_eq!(format_fiat(1.0), "1.00");
    }

    #[test]
    fn listed_token_populates_derived_metrics() {
        let response = assemble_response(
            "NPRO",
            "NPRO",
            "ref_finance",
            &supplies(),
            &listed_prices(),
            None,
            false,
            now()
        );

        assert_eq!(response.price.as_deref(), Some("0.05000000"));
        // 0.05 * 3_750_000 and 0.05 * 5_000_000
        assert_eq!(response.market_cap.as_deref(), Some("187500.00"));
        assert_eq!(response.fully_diluted_valuation.as_deref(), Some("250000.00"));
        assert_eq!(response.volume_24h, None);
        assert_eq!(response.circulating_supply, "3750000");
        assert_eq!(response.total_supply, "5000000");
        assert_eq!(response.max_supply, "10000000");
        assert_eq!(response.last_updated, "2026-08-06T12:00:00.000Z");
        assert!(response.meta.is_none());
    }

    #[test]
    fn unlisted_token_keeps_supplies_but_nulls_prices() {
        let response = assemble_response(
            "NPRO",
            "NPRO",
            "ref_finance",
            &supplies(),
            &unlisted_prices(),
            None,
            false,
            now()
        );

        assert_eq!(response.price, None);
        assert_eq!(response.market_cap, None);
        assert_eq!(response.fully_diluted_valuation, None);
        assert_eq!(response.circulating_supply, "3750000");
        assert_eq!(response.total_supply, "5000000");
    }

    #[test]
    fn meta_reports_active_source_when_price_found() {
        let response = assemble_response(
            "NPRO",
            "NPRO",
            "ref_finance",
            &supplies(),
            &listed_prices(),
            None,
            true,
            now()
        );

        let meta = response.meta.unwrap();
        assert_eq!(meta.price_source, "ref_finance");
        assert_eq!(meta.supply_source, "near_blockchain");
        assert_eq!(meta.near_usd_price, "2.5000");
        assert_eq!(meta.npro_near_price, "0.02000000");
    }

    #[test]
    fn meta_reports_unavailable_when_token_unlisted() {
        let response = assemble_response(
            "NPRO",
            "NPRO",
            "ref_finance",
            &supplies(),
            &unlisted_prices(),
            None,
            true,
            now()
        );

        let meta = response.meta.unwrap();
        assert_eq!(meta.price_source, "unavailable");
        assert_eq!(meta.npro_near_price, "unavailable");
        assert_eq!(meta.near_usd_price, "2.5000");
    }

    #[test]
    fn zero_ratio_renders_as_zero_not_unavailable() {
        // A present-but-zero ratio means the reference entry was missing
        // from the indexer map while the USD price existed
        let prices = PriceData {
            price_usd: Some(0.05),
            price_near: Some(0.0),
            near_usd: 2.5,
        };

        let response = assemble_response(
            "NPRO",
            "NPRO",
            "ref_finance",
            &supplies(),
            &prices,
            None,
            true,
            now()
        );

        assert_eq!(response.meta.unwrap().npro_near_price, "0.00000000");
    }

    #[test]
    fn wire_shape_uses_null_prices_and_renamed_meta() {
        let response = assemble_response(
            "NPRO",
            "NPRO",
            "ref_finance",
            &supplies(),
            &listed_prices(),
            None,
            true,
            now()
        );

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("_meta").is_some());
        assert!(json.get("meta").is_none());
        assert_eq!(json["volume_24h"], serde_json::Value::Null);
        assert_eq!(json["currency"], "USD");

        let degraded = assemble_response(
            "NPRO",
            "NPRO",
            "ref_finance",
            &supplies(),
            &unlisted_prices(),
            None,
            false,
            now()
        );
        let json = serde_json::to_value(&degraded).unwrap();
        assert_eq!(json["price"], serde_json::Value::Null);
        assert!(json.get("_meta").is_none());
    }
}
