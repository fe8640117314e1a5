//! Bridge RPC request and response shapes

use portal_core::constants::WITHDRAWAL_NOT_FOUND;
use portal_core::{AssetIdentifier, ChainId, TokenStandard};
use serde::{Deserialize, Deserializer, Serialize};

/// A token the bridge can deposit and withdraw.
///
/// Amount fields are base-unit integer strings. The bridge is inconsistent
/// about quoting them, so numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    pub asset_name: String,
    pub defuse_asset_identifier: AssetIdentifier,
    pub near_token_id: String,
    #[serde(default)]
    pub intents_token_id: String,
    pub decimals: u32,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub min_deposit_amount: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub min_withdrawal_amount: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub withdrawal_fee: Option<String>,
}

impl TokenDescriptor {
    /// Chain this token lives on (e.g. "eth:1")
    pub fn chain_id(&self) -> ChainId {
        self.defuse_asset_identifier.chain_id()
    }

    /// Standard encoded in the intents token id; plain ids are NEP-141
    pub fn standard(&self) -> TokenStandard {
        TokenStandard::from_intents_token_id(&self.intents_token_id)
            .map(|(standard, _)| standard)
            .unwrap_or(TokenStandard::Nep141)
    }

    /// Fill in the intents token id when the bridge left it out
    pub(crate) fn normalized(mut self) -> Self {
        if self.intents_token_id.is_empty() {
            self.intents_token_id = TokenStandard::Nep141.intents_token_id(&self.near_token_id);
        }
        self
    }
}

/// Deposit address for an (account, chain) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub chain: ChainId,
    pub address: String,
}

/// A deposit the bridge has observed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deposit {
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub decimals: u32,
    pub status: String,
    #[serde(default)]
    pub tx_hash: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub defuse_asset_identifier: Option<AssetIdentifier>,
}

/// Withdrawal details reported once the bridge has indexed the withdrawal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalData {
    #[serde(deserialize_with = "string_or_number")]
    pub amount: String,
    pub decimals: u32,
    #[serde(default)]
    pub transfer_tx_hash: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Raw `withdrawal_status` result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithdrawalRecord {
    pub status: String,
    #[serde(default)]
    pub data: Option<WithdrawalData>,
}

/// Withdrawal status as seen by a poller
#[derive(Debug, Clone, PartialEq)]
pub enum WithdrawalState {
    /// Not yet indexed by the bridge (absent result or `NOT_FOUND`)
    Pending,
    Known(WithdrawalRecord),
}

impl WithdrawalState {
    pub(crate) fn from_result(result: Option<WithdrawalRecord>) -> Self {
        match result {
            Some(record) if record.status != WITHDRAWAL_NOT_FOUND => Self::Known(record),
            _ => Self::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// NEP-413 message payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nep413Payload {
    pub message: String,
    /// Base64-encoded 32-byte nonce
    pub nonce: String,
    pub recipient: String,
}

impl Nep413Payload {
    /// Payload with a fresh random nonce
    pub fn new(message: impl Into<String>, recipient: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            nonce: generate_nonce(),
            recipient: recipient.into(),
        }
    }
}

/// Random 32-byte NEP-413 nonce, base64-encoded
pub fn generate_nonce() -> String {
    use base64::{engine::general_purpose::STANDARD, Engine};

    let bytes: [u8; 32] = rand::random();
    STANDARD.encode(bytes)
}

/// An intent signed off-chain by the user's wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedIntent {
    pub standard: String,
    pub payload: Nep413Payload,
    pub signature: String,
    pub public_key: String,
}

impl SignedIntent {
    pub fn nep413(payload: Nep413Payload, signature: String, public_key: String) -> Self {
        Self {
            standard: "nep413".to_string(),
            payload,
            signature,
            public_key,
        }
    }
}

// =============================================================================
// JSON-RPC envelope
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a, P: Serialize> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: [P; 1],
}

/// `{error}` is deliberately not modeled; a missing `result` is all callers see.
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse<R> {
    pub result: Option<R>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SupportedTokensParams<'a> {
    pub chains: &'a [ChainId],
}

#[derive(Debug, Deserialize)]
pub(crate) struct SupportedTokensResult {
    pub tokens: Vec<TokenDescriptor>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AccountChainParams<'a> {
    pub account_id: &'a str,
    pub chain: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecentDepositsResult {
    pub deposits: Option<Vec<Deposit>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct WithdrawalStatusParams<'a> {
    pub withdrawal_hash: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct PublishIntentParams<'a> {
    pub signed_data: &'a SignedIntent,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(serde_json::Number),
}

impl From<StringOrNumber> for String {
    fn from(v: StringOrNumber) -> Self {
        match v {
            StringOrNumber::String(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(d).map(String::from)
}

fn opt_string_or_number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<StringOrNumber>::deserialize(d)?.map(String::from))
}
