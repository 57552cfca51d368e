//! # auth — overlay token middleware
//!
//! Guards the local API with an `X-Overlay-Token` header.
//!
//! ## Mode
//! - `OVERLAY_TOKEN` unset (or empty) → **allow all** (default for a
//!   loopback-only service)
//! - `OVERLAY_TOKEN` set → every request must carry the token, either as the
//!   `X-Overlay-Token` header or as a `token` query parameter (browsers
//!   cannot set headers on a WebSocket upgrade)
//!
//! `/api/health` is always open.

use std::collections::HashMap;

use axum::{
    body::Body,
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::state::SharedState;

pub const TOKEN_HEADER: &str = "X-Overlay-Token";

pub async fn require_overlay_token(
    State(state): State<SharedState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config.overlay_token.as_deref() else {
        return next.run(request).await;
    };

    let path = request.uri().path();
    if path == "/api/health" {
        return next.run(request).await;
    }

    let from_header = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());

    let from_query = Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .ok()
        .and_then(|Query(mut params)| params.remove("token"));

    if from_header == Some(expected) || from_query.as_deref() == Some(expected) {
        next.run(request).await
    } else {
        warn!(path, "❌ Unauthorized request — invalid or missing overlay token");
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "ok":    false,
                "error": "Unauthorized: invalid or missing overlay token",
                "hint":  format!("Set the {TOKEN_HEADER} header or a token query parameter"),
            })),
        )
            .into_response()
    }
}
