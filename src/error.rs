//! # error
//!
//! Centralised error types.
//!
//! * [`AppError`] — returned by every axum handler; rendered as a structured
//!   JSON body so the overlay always gets a machine-readable response.
//! * [`FeedError`] — what a refresh tick can fail with.  Both variants are
//!   handled the same way by the chart snapshot: the error indicator is shown,
//!   the previous frame stays up, and the next tick retries.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// ─── AppError ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum AppError {
    /// The request payload was syntactically correct but semantically invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Unknown chart id, or a chart that has not produced a frame yet.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Catch-all for unexpected failures.
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {err}"),
            ),
        };

        let body = Json(json!({
            "ok":    false,
            "error": message,
        }));

        (status, body).into_response()
    }
}

// ─── FeedError ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeedError {
    /// The request to gexbot failed, timed out, was rejected, or the body was
    /// not JSON.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response arrived but lacks the `strikes` / `mini_contracts`
    /// collection a frame is built from.
    #[error("data shape error: {0}")]
    DataShape(String),
}

impl FeedError {
    /// Short machine-readable tag used in broadcast events.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::Transport(_) => "transport",
            FeedError::DataShape(_) => "data_shape",
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key as a query parameter.
        FeedError::Transport(err.without_url().to_string())
    }
}
