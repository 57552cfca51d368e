//! # poller — per-chart refresh loop
//!
//! ```text
//! every poll_interval (per chart, never overlapping):
//!   1. read credential            → empty? mark AWAITING_CREDENTIAL, skip
//!   2. fetch classic (+ state)    → GexFeed::fetch_pair
//!   3. build frame                → pipeline::build_from_feed
//!   4. apply to snapshot          → failure keeps the previous frame
//!   5. broadcast FRAME_UPDATED / CHART_ERROR
//! ```
//!
//! There is no backoff: a failed tick is retried on the next interval.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::pipeline;
use crate::events::WsEvent;
use crate::models::{ChartConfig, ChartSnapshot, ChartStatus};
use crate::state::{AppState, SharedState};

/// Starts the refresh loop for one chart.  Abort the handle to stop it.
pub fn spawn(
    state: SharedState,
    chart_id: Uuid,
    config: ChartConfig,
    snapshot: Arc<RwLock<ChartSnapshot>>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(state.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            chart_id = %chart_id,
            symbol   = %config.symbol,
            interval = ?state.config.poll_interval,
            "Poller started"
        );

        loop {
            ticker.tick().await;
            refresh(&state, chart_id, &config, &snapshot).await;
        }
    })
}

/// Runs one tick for one chart.
pub async fn refresh(
    state: &AppState,
    chart_id: Uuid,
    config: &ChartConfig,
    snapshot: &RwLock<ChartSnapshot>,
) {
    let api_key = state.credential().await;

    if api_key.is_empty() {
        let first_skip = {
            let mut snap = snapshot.write().await;
            let first = snap.status != ChartStatus::AwaitingCredential;
            snap.await_credential();
            first
        };
        if first_skip {
            debug!(chart_id = %chart_id, symbol = %config.symbol, "No credential — fetch skipped");
            state.broadcast(&WsEvent::AwaitingCredential { chart_id, symbol: config.symbol.clone() });
        }
        return;
    }

    state.tick_count.fetch_add(1, Ordering::Relaxed);

    let outcome = match state.feed.fetch_pair(&config.symbol, &api_key, config.secondary).await {
        Ok(pair) => pipeline::build_from_feed(pair, config, Utc::now()),
        Err(e) => Err(e),
    };

    let event = match &outcome {
        Ok(built) => {
            debug!(chart_id = %chart_id, symbol = %config.symbol, rows = built.frame.rows(), "Frame refreshed");
            WsEvent::FrameUpdated {
                chart_id,
                frame:             Box::new(built.frame.clone()),
                secondary_warning: built.secondary_warning.as_ref().map(|e| e.to_string()),
            }
        }
        Err(e) => {
            state.failure_count.fetch_add(1, Ordering::Relaxed);
            warn!(
                chart_id = %chart_id,
                symbol   = %config.symbol,
                kind     = e.kind(),
                error    = %e,
                "Refresh failed — keeping last frame, will retry next tick"
            );
            WsEvent::ChartError {
                chart_id,
                symbol: config.symbol.clone(),
                kind:   e.kind(),
                error:  e.to_string(),
            }
        }
    };

    snapshot.write().await.apply(outcome, Utc::now());
    state.broadcast(&event);
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
    use serde_json::json;

    use crate::config::Config;
    use crate::models::{ChartPosition, LevelKind};
    use crate::state::build_state;

    /// Fake gexbot that serves the end-to-end example until `down` is set.
    async fn fake_vendor(down: Arc<AtomicBool>) -> String {
        async fn classic(State(down): State<Arc<AtomicBool>>) -> impl IntoResponse {
            if down.load(Ordering::Relaxed) {
                return (StatusCode::SERVICE_UNAVAILABLE, "down").into_response();
            }
            Json(json!({
                "strikes":     [[100, 5], [105, -3], [110, 8]],
                "spot":        106.0,
                "sum_gex_vol": 4200.0,
            }))
            .into_response()
        }

        let router = Router::new()
            .route("/SPY/classic/zero", get(classic))
            .route(
                "/SPY/state/gamma",
                get(|| async { Json(json!({ "mini_contracts": [[110, 0, 0, -7.5]] })) }),
            )
            .with_state(down);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn spy() -> ChartConfig {
        ChartConfig::new("SPY", ChartPosition::Right, 1, Some(1), Some(1))
    }

    #[tokio::test]
    async fn test_refresh_then_outage_keeps_frame() {
        let down = Arc::new(AtomicBool::new(false));
        let base = fake_vendor(Arc::clone(&down)).await;
        let state = build_state(Config { base_url: base, api_key: "k".into(), ..Config::default() });
        let snapshot = RwLock::new(ChartSnapshot::default());
        let id = Uuid::new_v4();

        refresh(&state, id, &spy(), &snapshot).await;
        let first = snapshot.read().await.clone();
        assert_eq!(first.status, ChartStatus::Live);
        let frame = first.frame.clone().unwrap();
        assert_eq!(frame.ordered_prices, vec![105.0, 110.0]);
        assert_eq!(frame.secondary_values, vec![0.0, -7.5]);
        assert!((frame.annotation(LevelKind::Spot).unwrap().index - 0.2).abs() < 1e-9);

        down.store(true, Ordering::Relaxed);
        let mut rx = state.broadcast_tx.subscribe();
        refresh(&state, id, &spy(), &snapshot).await;

        let after = snapshot.read().await.clone();
        assert_eq!(after.status, ChartStatus::Error);
        assert_eq!(after.frame, Some(frame));
        assert!(after.error.is_some());
        assert!(rx.recv().await.unwrap().contains("CHART_ERROR"));
        assert_eq!(state.failure_count.load(Ordering::Relaxed), 1);
        assert_eq!(state.tick_count.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_missing_credential_skips_fetch() {
        let state = build_state(Config { base_url: "http://127.0.0.1:9".into(), ..Config::default() });
        let snapshot = RwLock::new(ChartSnapshot::default());
        let mut rx = state.broadcast_tx.subscribe();

        refresh(&state, Uuid::new_v4(), &spy(), &snapshot).await;
        refresh(&state, Uuid::new_v4(), &spy(), &snapshot).await;

        assert_eq!(snapshot.read().await.status, ChartStatus::AwaitingCredential);
        assert_eq!(state.tick_count.load(Ordering::Relaxed), 0);
        assert!(rx.recv().await.unwrap().contains("AWAITING_CREDENTIAL"));
        assert!(rx.try_recv().is_err());
    }
}
