//! NEAR RPC view calls
//!
//! Reads go straight to a NEAR RPC node with `query`/`call_function`. Writes
//! need a wallet signature, so [`ViewSession`] refuses them.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use portal_core::{AccountId, NearConfig, PortalError, Result};
use serde::Deserialize;

use crate::session::{FunctionCall, Session, TransactionOutcome};

/// View-call client for a NEAR RPC endpoint
#[derive(Clone)]
pub struct NearRpcViewer {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope {
    result: Option<CallFunctionResult>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CallFunctionResult {
    #[serde(default)]
    result: Option<Vec<u8>>,
    /// Set when the contract panicked during the view
    #[serde(default)]
    error: Option<String>,
}

impl NearRpcViewer {
    pub fn new(config: &NearConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("intents-portal")
            .build()
            .map_err(|e| PortalError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.rpc_url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        })
    }

    /// Run a view method and decode its JSON result
    pub async fn view(
        &self,
        contract_id: &str,
        method: &str,
        args: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "id": "portal",
            "method": "query",
            "params": {
                "request_type": "call_function",
                "finality": "final",
                "account_id": contract_id,
                "method_name": method,
                "args_base64": STANDARD.encode(serde_json::to_vec(args)?),
            }
        });

        tracing::debug!(contract_id, method, "NEAR view call");

        let send = async {
            let response = self
                .http
                .post(&self.url)
                .json(&request)
                .send()
                .await
                .map_err(|e| PortalError::transport(format!("{} request failed: {}", method, e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(PortalError::transport(format!(
                    "{} returned HTTP {}",
                    method, status
                )));
            }

            response
                .json::<RpcEnvelope>()
                .await
                .map_err(|e| PortalError::malformed(method, e.to_string()))
        };

        let envelope = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| {
                PortalError::transport(format!(
                    "{} timed out after {}s",
                    method,
                    self.timeout.as_secs()
                ))
            })??;

        decode_call_result(method, envelope)
    }
}

fn decode_call_result(method: &str, envelope: RpcEnvelope) -> Result<serde_json::Value> {
    if let Some(error) = envelope.error {
        let message = error["data"]
            .as_str()
            .or_else(|| error["message"].as_str())
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(PortalError::contract(format!("{}: {}", method, message)));
    }

    let result = envelope
        .result
        .ok_or_else(|| PortalError::malformed(method, "missing result"))?;

    if let Some(error) = result.error {
        return Err(PortalError::contract(format!("{}: {}", method, error)));
    }

    let bytes = result
        .result
        .ok_or_else(|| PortalError::malformed(method, "missing result bytes"))?;

    serde_json::from_slice(&bytes).map_err(|e| PortalError::malformed(method, e.to_string()))
}

/// Read-only session: views through [`NearRpcViewer`], calls rejected
#[derive(Clone)]
pub struct ViewSession {
    account: AccountId,
    viewer: NearRpcViewer,
}

impl ViewSession {
    pub fn new(viewer: NearRpcViewer, account: AccountId) -> Self {
        Self { account, viewer }
    }
}

#[async_trait]
impl Session for ViewSession {
    fn account_id(&self) -> &AccountId {
        &self.account
    }

    async fn view(
        &self,
        contract_id: &str,
        method: &str,
        args: serde_json::Value,
    ) -> Result<serde_json::Value> {
        self.viewer.view(contract_id, method, &args).await
    }

    async fn call(&self, call: FunctionCall) -> Result<TransactionOutcome> {
        Err(PortalError::contract(format!(
            "{} must be signed by the wallet of {}",
            call.method_name, self.account
        )))
    }
}
