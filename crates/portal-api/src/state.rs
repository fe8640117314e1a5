//! Application state shared across API handlers

use std::sync::Arc;
use std::time::Duration;

use bridge_rpc::{BridgeClient, TokenCatalog};
use intents_client::{AppContractClient, IntentsClient, NearRpcViewer, Session, ViewSession};
use portal_core::{AccountId, AppConfig, PortalError};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::poller::Poller;

/// Errors that can occur in the API layer
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Portal(#[from] PortalError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    bridge: BridgeClient,
    viewer: NearRpcViewer,
    catalog: RwLock<Option<TokenCatalog>>,
    poller: Poller,
}

impl AppState {
    /// Build clients for `config`. Nothing is fetched until first use.
    pub fn new(config: AppConfig) -> Result<Self, ApiError> {
        let bridge = BridgeClient::new(&config.bridge)?;
        let viewer = NearRpcViewer::new(&config.near)?;
        let poller = Poller::new(Duration::from_secs(config.poll.timeout_secs));

        tracing::info!(
            bridge = %config.bridge.url,
            near_rpc = %config.near.rpc_url,
            app_contract = ?config.near.app_contract_id,
            "Portal state initialised"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                bridge,
                viewer,
                catalog: RwLock::new(None),
                poller,
            }),
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn bridge(&self) -> &BridgeClient {
        &self.inner.bridge
    }

    pub fn poller(&self) -> &Poller {
        &self.inner.poller
    }

    /// Cached token catalog, fetched on first use or when `refresh` is set
    pub async fn token_catalog(&self, refresh: bool) -> Result<TokenCatalog, PortalError> {
        if !refresh {
            let cached = self.inner.catalog.read().await;
            if let Some(ref catalog) = *cached {
                return Ok(catalog.clone());
            }
        }

        let mut cached = self.inner.catalog.write().await;

        // Another request may have filled it while we waited for the write lock
        if !refresh {
            if let Some(ref catalog) = *cached {
                return Ok(catalog.clone());
            }
        }

        let catalog = self.inner.bridge.token_catalog().await?;
        tracing::info!("Token catalog loaded: {} tokens", catalog.len());
        *cached = Some(catalog.clone());
        Ok(catalog)
    }

    /// Read-only session for `account`
    pub fn session(&self, account: AccountId) -> Arc<dyn Session> {
        Arc::new(ViewSession::new(self.inner.viewer.clone(), account))
    }

    pub fn intents(&self, account: AccountId) -> IntentsClient {
        IntentsClient::new(
            self.session(account),
            self.inner.config.near.intents_contract_id.clone(),
        )
    }

    /// Application contract client; fails when no contract is configured
    pub fn app_contract(&self, account: AccountId) -> Result<AppContractClient, PortalError> {
        let contract_id = self.inner.config.near.require_app_contract()?;
        Ok(AppContractClient::new(self.session(account), contract_id))
    }
}
