//! Background watch endpoints
//!
//! Each watch polls one resource key; starting a watch on a key that is
//! already watched replaces it.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};

use portal_core::{AccountId, ChainId, PortalError};

use super::{balance::fetch_balance, require, ApiResult};
use crate::dto::{
    ApiError, DepositDto, WatchBalanceRequest, WatchCancelledResponse, WatchDepositsRequest,
    WatchStartedResponse, WatchWithdrawalRequest, WithdrawalStatusResponse,
};
use crate::poller::{balance_key, deposits_key, withdrawal_key, PollStep, WatchSnapshot};
use crate::AppState;

/// Create watch routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_watches))
        .route("/withdrawal", post(watch_withdrawal))
        .route("/deposits", post(watch_deposits))
        .route("/balance", post(watch_balance))
        .route("/:key", delete(cancel_watch))
}

/// GET /watch - Every watched key with its latest value
pub async fn list_watches(State(state): State<AppState>) -> Json<Vec<WatchSnapshot>> {
    Json(state.poller().snapshot().await)
}

/// POST /watch/withdrawal - Poll a withdrawal until it leaves the pending state
pub async fn watch_withdrawal(
    State(state): State<AppState>,
    Json(request): Json<WatchWithdrawalRequest>,
) -> ApiResult<WatchStartedResponse> {
    require("hash", &request.hash)?;

    let key = withdrawal_key(&request.hash);
    let interval = Duration::from_secs(state.config().poll.status_interval_secs);
    let bridge = state.bridge().clone();
    let hash = request.hash;

    let id = state
        .poller()
        .start(key.clone(), "withdrawal", interval, move || {
            let bridge = bridge.clone();
            let hash = hash.clone();
            async move {
                let status = bridge.withdrawal_status(&hash).await?;
                let pending = status.is_pending();
                let value = serde_json::to_value(WithdrawalStatusResponse::new(hash, status))?;
                Ok::<_, PortalError>(if pending {
                    PollStep::pending(value)
                } else {
                    PollStep::done(value)
                })
            }
        })
        .await;

    Ok(Json(WatchStartedResponse { id, key }))
}

/// POST /watch/deposits - Poll recent deposits for an account on a chain
pub async fn watch_deposits(
    State(state): State<AppState>,
    Json(request): Json<WatchDepositsRequest>,
) -> ApiResult<WatchStartedResponse> {
    require("account_id", &request.account_id)?;
    require("chain", &request.chain)?;

    let key = deposits_key(&request.account_id, &request.chain);
    let interval = Duration::from_secs(state.config().poll.status_interval_secs);
    let bridge = state.bridge().clone();
    let account = AccountId::new(request.account_id);
    let chain = ChainId::new(request.chain);

    let id = state
        .poller()
        .start(key.clone(), "deposits", interval, move || {
            let bridge = bridge.clone();
            let account = account.clone();
            let chain = chain.clone();
            async move {
                let deposits = bridge.recent_deposits(&account, &chain).await?;
                let dtos: Vec<DepositDto> = deposits.into_iter().map(DepositDto::from).collect();
                Ok::<_, PortalError>(PollStep::pending(serde_json::to_value(dtos)?))
            }
        })
        .await;

    Ok(Json(WatchStartedResponse { id, key }))
}

/// POST /watch/balance - Poll an intents balance
pub async fn watch_balance(
    State(state): State<AppState>,
    Json(request): Json<WatchBalanceRequest>,
) -> ApiResult<WatchStartedResponse> {
    require("account_id", &request.account_id)?;
    require("token_id", &request.token_id)?;

    let key = balance_key(&request.account_id, &request.token_id);
    let interval = Duration::from_secs(state.config().poll.balance_interval_secs);
    let poll_state = state.clone();
    let account_id = request.account_id;
    let token_id = request.token_id;

    let id = state
        .poller()
        .start(key.clone(), "balance", interval, move || {
            let state = poll_state.clone();
            let account_id = account_id.clone();
            let token_id = token_id.clone();
            async move {
                let balance = fetch_balance(&state, &account_id, &token_id).await?;
                Ok::<_, PortalError>(PollStep::pending(serde_json::to_value(balance)?))
            }
        })
        .await;

    Ok(Json(WatchStartedResponse { id, key }))
}

/// DELETE /watch/:key - Stop a watch
pub async fn cancel_watch(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> ApiResult<WatchCancelledResponse> {
    if !state.poller().cancel(&key).await {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiError::not_found(format!("No watch on {}", key))),
        ));
    }
    Ok(Json(WatchCancelledResponse {
        key,
        cancelled: true,
    }))
}
