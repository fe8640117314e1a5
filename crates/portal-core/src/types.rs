//! Core type definitions for the intents portal

use serde::{Deserialize, Serialize};
use std::fmt;

/// NEAR account ID (e.g. "alice.near")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Chain identifier in `<namespace>:<chain_ref>` form (e.g. "eth:1", "sol:mainnet")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub String);

impl ChainId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable chain name
    pub fn display_name(&self) -> String {
        crate::chains::chain_display_name(&self.0)
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bridge asset identifier: `<namespace>:<chain_ref>:<token_ref>`.
///
/// The token reference may itself contain colons, so only the first two
/// separators are significant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetIdentifier(pub String);

impl AssetIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first two colon-separated segments, used for address and deposit lookups.
    pub fn chain_id(&self) -> ChainId {
        let chain: Vec<&str> = self.0.splitn(3, ':').take(2).collect();
        ChainId(chain.join(":"))
    }

    /// Token reference after the chain id, if present
    pub fn token_ref(&self) -> Option<&str> {
        self.0.splitn(3, ':').nth(2)
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Token standard tag used by the intents contract in compound token ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenStandard {
    #[serde(rename = "NEP-141")]
    Nep141,
    #[serde(rename = "NEP-245")]
    Nep245,
}

impl TokenStandard {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Nep141 => "nep141:",
            Self::Nep245 => "nep245:",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nep141 => "NEP-141",
            Self::Nep245 => "NEP-245",
        }
    }

    /// Build the intents token id for an underlying token reference
    pub fn intents_token_id(&self, token_ref: &str) -> String {
        format!("{}{}", self.prefix(), token_ref)
    }

    /// Detect the standard of an already-prefixed intents token id
    pub fn from_intents_token_id(token_id: &str) -> Option<(Self, &str)> {
        if let Some(rest) = token_id.strip_prefix(Self::Nep141.prefix()) {
            Some((Self::Nep141, rest))
        } else {
            token_id
                .strip_prefix(Self::Nep245.prefix())
                .map(|rest| (Self::Nep245, rest))
        }
    }
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Base-unit token amount, kept as the decimal string the chain returns
pub type BaseUnits = String;

/// Constants
pub mod constants {
    /// Default bridge JSON-RPC endpoint
    pub const DEFAULT_BRIDGE_URL: &str = "https://bridge.chaindefuser.com/rpc";

    /// Default NEAR mainnet RPC endpoint (view calls)
    pub const DEFAULT_NEAR_RPC_URL: &str = "https://rpc.mainnet.near.org";

    /// Intents custody contract
    pub const INTENTS_CONTRACT_ID: &str = "intents.near";

    /// Gas attached to every contract call (100 Tgas)
    pub const CALL_GAS: u64 = 100_000_000_000_000;

    /// Deposit attached to intents calls (1 yoctoNEAR)
    pub const ONE_YOCTO: u128 = 1;

    /// Memo prefix carrying the withdrawal destination
    pub const WITHDRAW_MEMO_PREFIX: &str = "WITHDRAW_TO:";

    /// Withdrawal status sentinel meaning "not yet indexed"
    pub const WITHDRAWAL_NOT_FOUND: &str = "NOT_FOUND";
}
