/// Minimal NEAR JSON-RPC client for read-only contract calls
///
/// A direct `query`/`call_function` POST is much lighter than pulling in a
/// full SDK for view-only calls: arguments travel as base64-encoded JSON and
/// the result comes back as a byte array holding UTF-8 JSON.
use base64::{ engine::general_purpose, Engine as _ };
use serde::Deserialize;

use crate::apis::client::HttpClient;
use crate::core::{ MetricsError, MetricsResult };

pub struct NearRpcClient {
    http_client: HttpClient,
    rpc_url: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    pub result: Option<RpcCallResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcCallResult {
    pub result: Option<Vec<u8>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcError {
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl NearRpcClient {
    pub fn new(rpc_url: &str, timeout_secs: u64) -> MetricsResult<Self> {
        Ok(Self {
            http_client: HttpClient::new(timeout_secs)?,
            rpc_url: rpc_url.to_string(),
        })
    }

    /// Call a read-only contract view method and return its decoded JSON result
    pub async fn call_view_method(
        &self,
        contract: &str,
        method_name: &str,
        args: &serde_json::Value
    ) -> MetricsResult<serde_json::Value> {
        let args_base64 = general_purpose::STANDARD.encode(args.to_string());

        let payload =
            serde_json::json!({
            "jsonrpc": "2.0",
            "id": "dontcare",
            "method": "query",
            "params": {
                "request_type": "call_function",
                "finality": "final",
                "account_id": contract,
                "method_name": method_name,
                "args_base64": args_base64,
            }
        });

        let response = self.http_client
            .client()
            .post(&self.rpc_url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send().await
            .map_err(|e| MetricsError::Network(format!("NEAR RPC request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(
                MetricsError::ChainQuery(
                    format!("NEAR RPC returned status: {}", response.status())
                )
            );
        }

        let body: RpcResponse = response
            .json().await
            .map_err(|e| MetricsError::Parse(format!("Invalid NEAR RPC response: {}", e)))?;

        extract_view_result(body)
    }
}

/// Unwrap the RPC envelope and decode the view-call result bytes
fn extract_view_result(body: RpcResponse) -> MetricsResult<serde_json::Value> {
    if let Some(error) = body.error {
        let detail = error.data
            .as_ref()
            .and_then(|data| data.as_str())
            .map(|data| format!(" ({})", data))
            .unwrap_or_default();
        return Err(MetricsError::ChainQuery(format!("NEAR RPC error: {}{}", error.message, detail)));
    }

    let bytes = body.result
        .and_then(|result| result.result)
        .ok_or_else(|| MetricsError::Parse("NEAR RPC response has no result bytes".to_string()))?;

    let text = String::from_utf8(bytes).map_err(|e|
        MetricsError::Parse(format!("NEAR RPC result is not UTF-8: {}", e))
    )?;

    serde_json
        ::from_str(&text)
        .map_err(|e| MetricsError::Parse(format!("NEAR RPC result is not JSON: {}", e)))
}
