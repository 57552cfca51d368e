//! # routes::credential
//!
//! `POST /api/credential` — store the gexbot API key the overlay collected
//! from the user.  An empty key clears it and every chart goes back to
//! waiting.  The key itself is never echoed or logged.

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::state::SharedState;

#[derive(Debug, Deserialize)]
pub struct CredentialBody {
    pub key: String,
}

pub async fn set_credential(
    State(state): State<SharedState>,
    Json(body): Json<CredentialBody>,
) -> impl IntoResponse {
    let charts = state.set_credential(&body.key).await;

    Json(json!({
        "ok":         true,
        "configured": state.has_credential().await,
        "charts":     charts,
    }))
}
