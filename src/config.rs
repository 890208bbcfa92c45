use anyhow::{ Context, Result };
use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub rpc_url: String,
    pub token: TokenConfig,
    pub pricing: PricingConfig,
    pub server: ServerConfig,
    pub general: GeneralConfig,
    /// Per-outbound-call timeout for every upstream HTTP request
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    pub contract: String,
    pub symbol: String,
    pub name: String,
    /// Number of decimals of the token's minimal (yocto) unit
    pub decimals: u32,
    /// Fixed cap in whole tokens, independent of chain state
    pub max_supply: u64,
    /// Accounts whose holdings are contractually non-circulating
    pub excluded_accounts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    pub coingecko_url: String,
    pub reference_asset_id: String,
    pub reference_vs_currency: String,
    pub ref_finance_url: String,
    pub dexscreener_url: String,
    /// Contract of the wrapped reference asset in the indexer listings
    pub wrapped_reference_contract: String,
    /// Active DEX price backend: "ref_finance" or "dexscreener"
    pub dex_source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub log_level: String,
}

fn default_http_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.mainnet.near.org".to_string(),
            token: TokenConfig {
                contract: "npro.nearmobile.near".to_string(),
                symbol: "NPRO".to_string(),
                name: "NPRO".to_string(),
                decimals: 24,
                max_supply: 10_000_000,
                excluded_accounts: vec![
                    "npro-staking.sputnik-dao.near".to_string(),
                    "npro-treasury.sputnik-dao.near".to_string(),
                    "npro-marketing.sputnik-dao.near".to_string(),
                    "npro-liquidity.sputnik-dao.near".to_string(),
                    "npro-team.sputnik-dao.near".to_string(),
                    "distributor.nearmobile.near".to_string()
                ],
            },
            pricing: PricingConfig {
                coingecko_url: "https://api.coingecko.com/api/v3".to_string(),
                reference_asset_id: "near".to_string(),
                reference_vs_currency: "usd".to_string(),
                ref_finance_url: "https://indexer.ref.finance".to_string(),
                dexscreener_url: "https://api.dexscreener.com".to_string(),
                wrapped_reference_contract: "wrap.near".to_string(),
                dex_source: "ref_finance".to_string(),
            },
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            general: GeneralConfig {
                log_level: "info".to_string(),
            },
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            let default_config = Self::default();
            default_config.save(path)?;
            return Ok(default_config);
        }

        let content = fs
            ::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Self = serde_json
            ::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        config.validate()?;

        Ok(config)
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let content = serde_json
            ::to_string_pretty(self)
            .with_context(|| "Failed to serialize config")?;

        fs::write(path, content).with_context(|| format!("Failed to write config file: {}", path))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.token.contract.is_empty() {
            return Err(anyhow::anyhow!("token.contract is required in config"));
        }

        if self.rpc_url.is_empty() {
            return Err(anyhow::anyhow!("rpc_url is required in config"));
        }

        if self.http_timeout_secs == 0 {
            return Err(anyhow::anyhow!("http_timeout_secs must be greater than zero"));
        }

        match self.pricing.dex_source.as_str() {
            "ref_finance" | "dexscreener" => Ok(()),
            other =>
                Err(
                    anyhow::anyhow!(
                        "Unknown pricing.dex_source '{}' (expected 'ref_finance' or 'dexscreener')",
                        other
                    )
                ),
        }
    }
}
