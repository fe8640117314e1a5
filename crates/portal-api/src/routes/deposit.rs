//! Deposit address and history endpoints

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use portal_core::{AccountId, ChainId};

use super::{portal_error, require, ApiResult};
use crate::dto::{AccountChainQuery, DepositAddressResponse, DepositDto};
use crate::AppState;

/// Create deposit routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/address", get(get_deposit_address))
        .route("/recent", get(get_recent_deposits))
}

/// GET /deposit/address - Deposit address for an account on a chain
pub async fn get_deposit_address(
    State(state): State<AppState>,
    Query(query): Query<AccountChainQuery>,
) -> ApiResult<DepositAddressResponse> {
    require("account_id", &query.account_id)?;
    require("chain", &query.chain)?;

    let address = state
        .bridge()
        .deposit_address(&AccountId::new(query.account_id), &ChainId::new(query.chain))
        .await
        .map_err(portal_error)?;

    Ok(Json(DepositAddressResponse {
        chain_name: address.chain.display_name(),
        chain: address.chain.0,
        address: address.address,
    }))
}

/// GET /deposit/recent - Recent deposits, newest first
pub async fn get_recent_deposits(
    State(state): State<AppState>,
    Query(query): Query<AccountChainQuery>,
) -> ApiResult<Vec<DepositDto>> {
    require("account_id", &query.account_id)?;
    require("chain", &query.chain)?;

    let deposits = state
        .bridge()
        .recent_deposits(&AccountId::new(query.account_id), &ChainId::new(query.chain))
        .await
        .map_err(portal_error)?;

    Ok(Json(deposits.into_iter().map(DepositDto::from).collect()))
}
