//! Signed intent publication

use axum::{extract::State, routing::post, Json, Router};

use bridge_rpc::SignedIntent;

use super::{portal_error, require, ApiResult};
use crate::dto::PublishResponse;
use crate::AppState;

/// Create intents routes
pub fn router() -> Router<AppState> {
    Router::new().route("/publish", post(publish))
}

/// POST /intents/publish - Forward a NEP-413 signed intent to the bridge
pub async fn publish(
    State(state): State<AppState>,
    Json(intent): Json<SignedIntent>,
) -> ApiResult<PublishResponse> {
    require("signature", &intent.signature)?;
    require("public_key", &intent.public_key)?;

    state
        .bridge()
        .publish_intent(&intent)
        .await
        .map_err(portal_error)?;

    Ok(Json(PublishResponse { published: true }))
}
