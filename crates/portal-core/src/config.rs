//! Configuration types for the intents portal

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_BRIDGE_URL, DEFAULT_NEAR_RPC_URL, INTENTS_CONTRACT_ID};
use crate::{PortalError, Result};

/// Environment variable holding the application (lock) contract account
pub const ENV_CONTRACT_ID: &str = "PORTAL_CONTRACT_ID";
pub const ENV_BRIDGE_URL: &str = "PORTAL_BRIDGE_URL";
pub const ENV_NEAR_RPC_URL: &str = "PORTAL_NEAR_RPC_URL";
pub const ENV_API_PORT: &str = "PORTAL_API_PORT";

/// Bridge RPC connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// JSON-RPC endpoint URL
    pub url: String,

    /// Per-request timeout
    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_BRIDGE_URL.to_string(),
            timeout_secs: default_request_timeout(),
        }
    }
}

/// NEAR RPC and contract configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearConfig {
    /// RPC endpoint used for view calls
    pub rpc_url: String,

    /// Intents custody contract
    pub intents_contract_id: String,

    /// Application lock contract, if configured
    #[serde(default)]
    pub app_contract_id: Option<String>,

    #[serde(default = "default_request_timeout")]
    pub timeout_secs: u64,
}

impl NearConfig {
    /// Application contract account, or a configuration error when unset
    pub fn require_app_contract(&self) -> Result<&str> {
        self.app_contract_id
            .as_deref()
            .ok_or_else(|| PortalError::Config(format!("{} is not set", ENV_CONTRACT_ID)))
    }
}

impl Default for NearConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_NEAR_RPC_URL.to_string(),
            intents_contract_id: INTENTS_CONTRACT_ID.to_string(),
            app_contract_id: None,
            timeout_secs: default_request_timeout(),
        }
    }
}

/// Polling intervals (seconds)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_balance_interval")]
    pub balance_interval_secs: u64,

    /// Deposits and withdrawal status
    #[serde(default = "default_status_interval")]
    pub status_interval_secs: u64,

    /// Watches older than this are dropped
    #[serde(default = "default_watch_timeout")]
    pub timeout_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            balance_interval_secs: default_balance_interval(),
            status_interval_secs: default_status_interval(),
            timeout_secs: default_watch_timeout(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub bridge: BridgeConfig,

    #[serde(default)]
    pub near: NearConfig,

    #[serde(default)]
    pub poll: PollConfig,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

impl AppConfig {
    /// Defaults overlaid with `PORTAL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(contract) = lookup(ENV_CONTRACT_ID).filter(|v| !v.trim().is_empty()) {
            config.near.app_contract_id = Some(contract.trim().to_string());
        }
        if let Some(url) = lookup(ENV_BRIDGE_URL) {
            config.bridge.url = url;
        }
        if let Some(url) = lookup(ENV_NEAR_RPC_URL) {
            config.near.rpc_url = url;
        }
        if let Some(port) = lookup(ENV_API_PORT) {
            config.api_port = port.parse().map_err(|_| {
                PortalError::Config(format!("{} must be a port number, got '{}'", ENV_API_PORT, port))
            })?;
        }

        Ok(config)
    }
}

fn default_api_port() -> u16 {
    19080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_balance_interval() -> u64 {
    5
}

fn default_status_interval() -> u64 {
    1
}

fn default_watch_timeout() -> u64 {
    40 * 60
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bridge.url, "https://bridge.chaindefuser.com/rpc");
        assert_eq!(config.near.intents_contract_id, "intents.near");
        assert_eq!(config.near.app_contract_id, None);
        assert_eq!(config.poll.balance_interval_secs, 5);
        assert_eq!(config.poll.status_interval_secs, 1);
        assert_eq!(config.api_port, 19080);
    }

    #[test]
    fn test_from_lookup() {
        let env: HashMap<&str, &str> = [
            ("PORTAL_CONTRACT_ID", "locker.alice.near"),
            ("PORTAL_API_PORT", "8080"),
        ]
        .into_iter()
        .collect();

        let config = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.near.require_app_contract().unwrap(), "locker.alice.near");
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.bridge.url, "https://bridge.chaindefuser.com/rpc");
    }

    #[test]
    fn test_missing_contract_is_config_error() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        let err = config.near.require_app_contract().unwrap_err();
        assert_eq!(err.error_code(), "config_error");
    }

    #[test]
    fn test_bad_port() {
        let result = AppConfig::from_lookup(|k| (k == "PORTAL_API_PORT").then(|| "abc".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.bridge.url, config.bridge.url);
        assert_eq!(parsed.poll.timeout_secs, 2400);
    }
}
