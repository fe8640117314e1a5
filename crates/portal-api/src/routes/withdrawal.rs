//! Withdrawal endpoints

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};

use intents_client::{withdraw_call, FunctionCall, WithdrawRequest};
use portal_core::parse_decimal_amount;

use super::{bad_request, portal_error, require, ApiResult};
use crate::dto::{WithdrawCallRequest, WithdrawalQuery, WithdrawalStatusResponse};
use crate::AppState;

/// Create withdrawal routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/call", post(build_withdraw_call))
}

/// GET /withdrawal/status - Bridge status of a withdrawal
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<WithdrawalQuery>,
) -> ApiResult<WithdrawalStatusResponse> {
    require("hash", &query.hash)?;

    let status = state
        .bridge()
        .withdrawal_status(&query.hash)
        .await
        .map_err(portal_error)?;

    Ok(Json(WithdrawalStatusResponse::new(query.hash, status)))
}

/// POST /withdrawal/call - Unsigned `ft_withdraw`/`mt_withdraw` for the wallet to sign
pub async fn build_withdraw_call(
    State(state): State<AppState>,
    Json(request): Json<WithdrawCallRequest>,
) -> ApiResult<FunctionCall> {
    let amount = match (request.amount, request.display_amount) {
        (Some(amount), None) => amount,
        (None, Some(display)) => {
            parse_decimal_amount(Some(&display), request.decimals).ok_or_else(|| {
                bad_request(format!("Cannot parse '{}' as a token amount", display))
            })?
        }
        _ => return Err(bad_request("Exactly one of amount or display_amount is required")),
    };

    let call = withdraw_call(
        &state.config().near.intents_contract_id,
        &WithdrawRequest {
            intents_token_id: request.intents_token_id,
            amount,
            destination: request.destination,
        },
    )
    .map_err(portal_error)?;

    Ok(Json(call))
}
