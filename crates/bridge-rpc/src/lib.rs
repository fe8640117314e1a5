//! bridge-rpc: JSON-RPC 2.0 client for the multichain bridge
//!
//! Covers the five bridge methods the portal relies on. The client never
//! retries: a caller that wants fresh data polls again.

pub mod catalog;
pub mod types;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use portal_core::{AccountId, BridgeConfig, ChainId, PortalError};
use serde::de::DeserializeOwned;
use serde::Serialize;

pub use catalog::TokenCatalog;
pub use types::{
    generate_nonce, Deposit, DepositAddress, Nep413Payload, SignedIntent, TokenDescriptor,
    WithdrawalData, WithdrawalRecord, WithdrawalState,
};

use types::{
    AccountChainParams, PublishIntentParams, RecentDepositsResult, RpcRequest, RpcResponse,
    SupportedTokensParams, SupportedTokensResult, WithdrawalStatusParams,
};

/// Result type for bridge client operations
pub type Result<T> = std::result::Result<T, PortalError>;

/// Bridge JSON-RPC client
#[derive(Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    url: String,
    timeout: Duration,
    next_id: Arc<AtomicU64>,
}

impl BridgeClient {
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent("intents-portal")
            .build()
            .map_err(|e| PortalError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            url: config.url.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// All supported tokens; an empty `chains` slice means every chain
    pub async fn supported_tokens(&self, chains: &[ChainId]) -> Result<Vec<TokenDescriptor>> {
        let result: SupportedTokensResult = self
            .call("supported_tokens", SupportedTokensParams { chains })
            .await?
            .ok_or_else(|| PortalError::malformed("supported_tokens", "missing result"))?;

        Ok(result
            .tokens
            .into_iter()
            .map(TokenDescriptor::normalized)
            .collect())
    }

    /// Supported tokens on every chain, unique by asset identifier
    pub async fn token_catalog(&self) -> Result<TokenCatalog> {
        let tokens = self.supported_tokens(&[]).await?;
        tracing::debug!("Bridge returned {} tokens", tokens.len());
        Ok(TokenCatalog::from_tokens(tokens))
    }

    /// Deposit address for an account on a chain
    pub async fn deposit_address(
        &self,
        account_id: &AccountId,
        chain: &ChainId,
    ) -> Result<DepositAddress> {
        let params = AccountChainParams {
            account_id: account_id.as_str(),
            chain: chain.as_str(),
        };
        self.call("deposit_address", params)
            .await?
            .ok_or_else(|| PortalError::malformed("deposit_address", "missing result"))
    }

    /// Recent deposits for an account on a chain, newest first
    pub async fn recent_deposits(
        &self,
        account_id: &AccountId,
        chain: &ChainId,
    ) -> Result<Vec<Deposit>> {
        let params = AccountChainParams {
            account_id: account_id.as_str(),
            chain: chain.as_str(),
        };
        let result: Option<RecentDepositsResult> = self.call("recent_deposits", params).await?;

        let mut deposits = result.and_then(|r| r.deposits).unwrap_or_default();
        deposits.reverse();
        Ok(deposits)
    }

    /// Status of a withdrawal, keyed by the withdrawal transaction hash
    pub async fn withdrawal_status(&self, withdrawal_hash: &str) -> Result<WithdrawalState> {
        let result: Option<WithdrawalRecord> = self
            .call("withdrawal_status", WithdrawalStatusParams { withdrawal_hash })
            .await?;
        Ok(WithdrawalState::from_result(result))
    }

    /// Submit a signed intent. The bridge's answer is only logged.
    pub async fn publish_intent(&self, signed_data: &SignedIntent) -> Result<()> {
        let response: Option<serde_json::Value> = self
            .call("publish_intent", PublishIntentParams { signed_data })
            .await?;
        tracing::info!(
            recipient = %signed_data.payload.recipient,
            "publish_intent response: {}",
            response.unwrap_or(serde_json::Value::Null)
        );
        Ok(())
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<Option<R>> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            method,
            params: [params],
        };

        tracing::debug!(method, id = request.id, "Bridge RPC request");

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
                .json::<RpcResponse<R>>()
                .await
                .map_err(|e| PortalError::malformed(method, e.to_string()))
        };

        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| {
                PortalError::transport(format!(
                    "{} timed out after {}s",
                    method,
                    self.timeout.as_secs()
                ))
            })??;

        Ok(response.result)
    }
}
