//! Intents portal service library

use anyhow::Context;
use portal_api::AppState;
use portal_core::AppConfig;

/// Install the tracing subscriber; `RUST_LOG` adds to the defaults
pub fn init_tracing() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive("portal=debug".parse()?)
        .add_directive("bridge_rpc=debug".parse()?)
        .add_directive("intents_client=debug".parse()?)
        .add_directive("info".parse()?);

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

/// Run the portal API until shutdown
pub async fn run() -> anyhow::Result<()> {
    init_tracing()?;

    tracing::info!("Starting intents portal {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env().context("invalid configuration")?;
    if config.near.app_contract_id.is_none() {
        tracing::warn!(
            "{} is not set; application contract routes are disabled",
            portal_core::ENV_CONTRACT_ID
        );
    }

    let port = config.api_port;
    let state = AppState::new(config).context("failed to initialise portal state")?;

    portal_api::start_server(state, port)
        .await
        .with_context(|| format!("API server on port {} failed", port))?;

    tracing::info!("Intents portal stopped");
    Ok(())
}
