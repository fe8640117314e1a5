//! Application contract endpoints

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use intents_client::{lock_call, FunctionCall};
use portal_core::{format_decimal_amount, AccountId};

use super::{portal_error, require, ApiResult};
use crate::dto::{AccountQuery, LockCallRequest, LockedTokenDto};
use crate::AppState;

/// Create locked-token routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_locked))
        .route("/call", post(build_lock_call))
}

/// GET /locked - Tokens held for an account by the application contract
pub async fn get_locked(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> ApiResult<Vec<LockedTokenDto>> {
    require("account_id", &query.account_id)?;

    let account = AccountId::new(query.account_id);
    let locked = state
        .app_contract(account.clone())
        .map_err(portal_error)?
        .get_tokens_for_account(&account, query.from_index, query.limit)
        .await
        .map_err(portal_error)?;

    let catalog = state.token_catalog(false).await.unwrap_or_else(|e| {
        tracing::warn!("Token catalog unavailable for locked tokens: {}", e);
        Default::default()
    });

    let tokens = locked
        .into_iter()
        .map(|token| {
            let known = catalog.find_by_near_token_id(&token.token_id);
            let decimals = known.map(|t| t.decimals);
            LockedTokenDto {
                formatted_amount: format_decimal_amount(Some(&token.amount), decimals),
                asset_name: known.map(|t| t.asset_name.clone()),
                decimals,
                token_id: token.token_id,
                amount: token.amount,
            }
        })
        .collect();

    Ok(Json(tokens))
}

/// POST /locked/call - Unsigned `mt_transfer_call` moving the full intents
/// balance into the application contract
pub async fn build_lock_call(
    State(state): State<AppState>,
    Json(request): Json<LockCallRequest>,
) -> ApiResult<FunctionCall> {
    require("account_id", &request.account_id)?;
    require("intents_token_id", &request.intents_token_id)?;

    let receiver = state
        .config()
        .near
        .require_app_contract()
        .map_err(portal_error)?
        .to_string();

    let intents = state.intents(AccountId::new(request.account_id));
    let balance = intents
        .mt_balance_of(&request.intents_token_id)
        .await
        .map_err(portal_error)?;

    let call = lock_call(
        intents.contract_id(),
        &request.intents_token_id,
        &receiver,
        &balance,
    )
    .map_err(portal_error)?;

    Ok(Json(call))
}
