//! Intents balance endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use portal_core::{format_decimal_amount, AccountId};

use super::{portal_error, require, ApiResult};
use crate::dto::{BalanceQuery, BalanceResponse};
use crate::AppState;

/// GET /balance - Dual-standard intents balance, formatted with catalog decimals
pub async fn get_balance(
    State(state): State<AppState>,
    Query(query): Query<BalanceQuery>,
) -> ApiResult<BalanceResponse> {
    require("account_id", &query.account_id)?;
    require("token_id", &query.token_id)?;

    Ok(Json(
        fetch_balance(&state, &query.account_id, &query.token_id)
            .await
            .map_err(portal_error)?,
    ))
}

/// Shared with the balance watcher
pub(crate) async fn fetch_balance(
    state: &AppState,
    account_id: &str,
    token_id: &str,
) -> Result<BalanceResponse, portal_core::PortalError> {
    let intents = state.intents(AccountId::new(account_id));
    let (probed, catalog) = futures::join!(intents.balance_of(token_id), state.token_catalog(false));
    let probed = probed?;

    // Missing catalog only costs formatting
    let decimals = match catalog {
        Ok(catalog) => catalog.find_by_near_token_id(token_id).map(|t| t.decimals),
        Err(e) => {
            tracing::warn!("Token catalog unavailable for formatting: {}", e);
            None
        }
    };

    Ok(BalanceResponse {
        account_id: account_id.to_string(),
        token_id: token_id.to_string(),
        formatted_balance: format_decimal_amount(Some(&probed.balance), decimals),
        balance: probed.balance,
        standard: probed.standard,
        decimals,
    })
}
