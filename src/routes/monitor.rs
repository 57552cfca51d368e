//! # routes::monitor
//!
//! | Method   | Path          | Description                                 |
//! |----------|---------------|---------------------------------------------|
//! | GET (WS) | `/ws/charts`  | Real-time chart event stream                |
//! | GET      | `/api/health` | Liveness plus tick / failure counters       |

use std::sync::atomic::Ordering;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    Json,
};
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tracing::{debug, info};

use crate::state::SharedState;

// ─── WebSocket Handler ────────────────────────────────────────────────────────

/// Upgrades to a WebSocket and forwards every [`crate::events::WsEvent`].
///
/// The first message is a `SNAPSHOT` with every chart and its last frame, so
/// a freshly injected overlay can draw without waiting for the next tick.
pub async fn ws_charts(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: SharedState) {
    // Subscribe before reading the registry so no event falls in between.
    let mut rx = state.broadcast_tx.subscribe();
    let (mut sender, mut receiver) = socket.split();

    info!("🔌 Overlay connected");

    let snapshot = {
        let mut charts = Vec::new();
        for listed in state.list_charts().await {
            if let Some(view) = state.chart(listed.id).await {
                charts.push(view);
            }
        }

        json!({
            "event":          "SNAPSHOT",
            "has_credential": state.has_credential().await,
            "charts":         charts,
        })
        .to_string()
    };

    if sender.send(Message::Text(snapshot)).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(json_str) => {
                        if sender.send(Message::Text(json_str)).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(n)) => {
                        debug!("Overlay lagged, skipped {n} events");
                    }
                    Err(_) => break,
                }
            }

            result = receiver.next() => {
                match result {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sender.send(Message::Pong(data)).await;
                    }
                    _ => {}
                }
            }
        }
    }

    info!("🔌 Overlay disconnected");
}

// ─── GET /api/health ──────────────────────────────────────────────────────────

pub async fn health(State(state): State<SharedState>) -> impl IntoResponse {
    Json(json!({
        "ok":             true,
        "service":        "gexlens",
        "version":        env!("CARGO_PKG_VERSION"),
        "charts":         state.chart_count().await,
        "has_credential": state.has_credential().await,
        "tick_count":     state.tick_count.load(Ordering::Relaxed),
        "failure_count":  state.failure_count.load(Ordering::Relaxed),
    }))
}
