//! Data Transfer Objects for API requests and responses

use bridge_rpc::{Deposit, TokenDescriptor, WithdrawalData, WithdrawalState};
use portal_core::{format_decimal_amount, TokenStandard};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("bad_request", message)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokensQuery {
    #[serde(default)]
    pub refresh: bool,
}

/// One chain an asset can be deposited from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetChainDto {
    pub chain: String,
    pub chain_name: String,
    pub defuse_asset_identifier: String,
    pub near_token_id: String,
    pub intents_token_id: String,
    pub decimals: u32,
}

impl From<&TokenDescriptor> for AssetChainDto {
    fn from(token: &TokenDescriptor) -> Self {
        let chain = token.chain_id();
        Self {
            chain_name: chain.display_name(),
            chain: chain.0,
            defuse_asset_identifier: token.defuse_asset_identifier.to_string(),
            near_token_id: token.near_token_id.clone(),
            intents_token_id: token.intents_token_id.clone(),
            decimals: token.decimals,
        }
    }
}

/// An asset and every chain it is available on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDto {
    pub asset_name: String,
    pub chains: Vec<AssetChainDto>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountChainQuery {
    pub account_id: String,
    pub chain: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositAddressResponse {
    pub address: String,
    pub chain: String,
    pub chain_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositDto {
    pub amount: String,
    pub formatted_amount: String,
    pub decimals: u32,
    pub status: String,
    pub tx_hash: String,
    pub created_at: String,
}

impl From<Deposit> for DepositDto {
    fn from(deposit: Deposit) -> Self {
        Self {
            formatted_amount: format_decimal_amount(Some(&deposit.amount), Some(deposit.decimals)),
            amount: deposit.amount,
            decimals: deposit.decimals,
            status: deposit.status,
            tx_hash: deposit.tx_hash,
            created_at: deposit.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawalQuery {
    pub hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalStatusResponse {
    pub hash: String,
    pub pending: bool,
    /// Bridge status string; "PENDING" while the bridge has not indexed it
    pub status: String,
    pub formatted_amount: Option<String>,
    pub data: Option<WithdrawalData>,
}

impl WithdrawalStatusResponse {
    pub fn new(hash: String, state: WithdrawalState) -> Self {
        match state {
            WithdrawalState::Pending => Self {
                hash,
                pending: true,
                status: "PENDING".to_string(),
                formatted_amount: None,
                data: None,
            },
            WithdrawalState::Known(record) => Self {
                hash,
                pending: false,
                status: record.status,
                formatted_amount: record
                    .data
                    .as_ref()
                    .map(|d| format_decimal_amount(Some(&d.amount), Some(d.decimals))),
                data: record.data,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishResponse {
    pub published: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BalanceQuery {
    pub account_id: String,
    /// Underlying token reference, e.g. `wrap.near`
    pub token_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceResponse {
    pub account_id: String,
    pub token_id: String,
    pub balance: String,
    pub formatted_balance: String,
    pub standard: Option<TokenStandard>,
    pub decimals: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountQuery {
    pub account_id: String,
    pub from_index: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockedTokenDto {
    pub token_id: String,
    pub amount: String,
    pub formatted_amount: String,
    pub asset_name: Option<String>,
    pub decimals: Option<u32>,
}

/// Unsigned withdrawal call request
#[derive(Debug, Clone, Deserialize)]
pub struct WithdrawCallRequest {
    pub intents_token_id: String,
    /// Base-unit amount; mutually exclusive with `display_amount`
    pub amount: Option<String>,
    /// Human amount, converted with `decimals`
    pub display_amount: Option<String>,
    pub decimals: Option<u32>,
    pub destination: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LockCallRequest {
    pub account_id: String,
    pub intents_token_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchWithdrawalRequest {
    pub hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchDepositsRequest {
    pub account_id: String,
    pub chain: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchBalanceRequest {
    pub account_id: String,
    pub token_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchStartedResponse {
    pub id: String,
    pub key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchCancelledResponse {
    pub key: String,
    pub cancelled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_rpc::WithdrawalRecord;

    #[test]
    fn test_pending_withdrawal_response() {
        let response = WithdrawalStatusResponse::new("h".to_string(), WithdrawalState::Pending);
        assert!(response.pending);
        assert_eq!(response.status, "PENDING");
        assert!(response.formatted_amount.is_none());
    }

    #[test]
    fn test_known_withdrawal_response() {
        let state = WithdrawalState::Known(WithdrawalRecord {
            status: "COMPLETED".to_string(),
            data: Some(WithdrawalData {
                amount: "1500000".to_string(),
                decimals: 6,
                transfer_tx_hash: Some("0xabc".to_string()),
                created_at: None,
            }),
        });
        let response = WithdrawalStatusResponse::new("h".to_string(), state);
        assert!(!response.pending);
        assert_eq!(response.status, "COMPLETED");
        assert_eq!(response.formatted_amount.as_deref(), Some("1.5"));
    }

    #[test]
    fn test_deposit_dto_formats_amount() {
        let dto = DepositDto::from(Deposit {
            amount: "1234567".to_string(),
            decimals: 2,
            status: "COMPLETED".to_string(),
            tx_hash: "0x1".to_string(),
            created_at: String::new(),
            defuse_asset_identifier: None,
        });
        assert_eq!(dto.formatted_amount, "12,345.67");
    }
}
