/// Base HTTP client shared by the upstream API readers
use reqwest::Client;
use std::time::Duration;

use crate::core::{ MetricsError, MetricsResult };

/// HTTP client wrapper with a fixed per-request timeout
///
/// A timed-out request surfaces as a transport error and follows the owning
/// branch's failure policy (degrade or propagate).
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout_secs: u64) -> MetricsResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(concat!("npro-metrics/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MetricsError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_keeps_configured_timeout() {
        let client = HttpClient::new(7).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(7));
    }
}
