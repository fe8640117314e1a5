//! Supported token endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use bridge_rpc::TokenDescriptor;

use super::{portal_error, ApiResult};
use crate::dto::{AssetChainDto, AssetDto, TokensQuery};
use crate::AppState;

/// Create token routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_tokens))
        .route("/assets", get(get_assets))
}

/// GET /tokens - Deduplicated supported tokens
pub async fn get_tokens(
    State(state): State<AppState>,
    Query(query): Query<TokensQuery>,
) -> ApiResult<Vec<TokenDescriptor>> {
    let catalog = state
        .token_catalog(query.refresh)
        .await
        .map_err(portal_error)?;
    Ok(Json(catalog.tokens))
}

/// GET /tokens/assets - Tokens grouped by asset name
pub async fn get_assets(State(state): State<AppState>) -> ApiResult<Vec<AssetDto>> {
    let catalog = state.token_catalog(false).await.map_err(portal_error)?;

    let assets = catalog
        .asset_names()
        .into_iter()
        .map(|name| AssetDto {
            asset_name: name.to_string(),
            chains: catalog
                .chains_for_asset(name)
                .into_iter()
                .map(AssetChainDto::from)
                .collect(),
        })
        .collect();

    Ok(Json(assets))
}
