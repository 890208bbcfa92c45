use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("Configuration error: {0}")] Config(String),

    #[error("Chain query error: {0}")] ChainQuery(String),

    #[error("Price unavailable: {0}")] PriceUnavailable(String),

    #[error("Network error: {0}")] Network(String),

    #[error("Parse error: {0}")] Parse(String),
}

/// Result type used throughout the crate
pub type MetricsResult<T> = Result<T, MetricsError>;
