//! # state
//!
//! [`AppState`] is the context object every chart instance and every axum
//! handler shares: configuration, the vendor credential, the HTTP feed, the
//! chart registry and the broadcast channel.
//!
//! Chart instances do not share mutable data with each other.  Each owns its
//! [`ChartSnapshot`] behind its own lock, and its poller task is aborted when
//! the instance leaves the registry.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::events::WsEvent;
use crate::feed::GexFeed;
use crate::models::chart::ScreenAnchor;
use crate::models::{ChartConfig, ChartSnapshot};
use crate::poller;

// ─── ChartInstance ────────────────────────────────────────────────────────────

/// One widget's registry entry.  Dropping it stops its poller.
pub struct ChartInstance {
    pub id:       Uuid,
    pub config:   ChartConfig,
    pub snapshot: Arc<RwLock<ChartSnapshot>>,
    task:         JoinHandle<()>,
}

impl Drop for ChartInstance {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// What the overlay gets when it asks about a chart.
#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub id:           Uuid,
    pub config:       ChartConfig,
    pub anchor:       ScreenAnchor,
    pub classic_link: String,
    pub stale:        bool,
    #[serde(flatten)]
    pub snapshot:     ChartSnapshot,
}

// ─── AppState ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Shared reqwest client (connection pooling) wrapped with the vendor URLs.
    pub feed: GexFeed,

    /// Vendor API key.  Empty = charts stay registered but skip fetching.
    credential: Arc<RwLock<String>>,

    /// Registered chart instances in registration order.
    charts: Arc<RwLock<Vec<ChartInstance>>>,

    /// Pre-serialised [`WsEvent`] JSON for `/ws/charts` subscribers.
    pub broadcast_tx: broadcast::Sender<String>,

    // ── Metrics ───────────────────────────────────────────────────────────────
    pub tick_count:    Arc<AtomicU64>,
    pub failure_count: Arc<AtomicU64>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let (broadcast_tx, _) = broadcast::channel(256);
        let feed = GexFeed::new(reqwest::Client::new(), &config.base_url, config.request_timeout);

        Self {
            credential:    Arc::new(RwLock::new(config.api_key.clone())),
            config:        Arc::new(config),
            feed,
            charts:        Arc::new(RwLock::new(Vec::new())),
            broadcast_tx,
            tick_count:    Arc::new(AtomicU64::new(0)),
            failure_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Sends an event to every WebSocket client.  Having no listener is fine.
    pub fn broadcast(&self, event: &WsEvent) {
        let _ = self.broadcast_tx.send(event.to_json());
    }

    // ── Credential ────────────────────────────────────────────────────────────

    pub async fn credential(&self) -> String {
        self.credential.read().await.clone()
    }

    pub async fn has_credential(&self) -> bool {
        !self.credential.read().await.is_empty()
    }

    /// Stores a new key (trimmed; empty clears it) and recreates every chart
    /// so they all pick it up on a fresh first tick.
    pub async fn set_credential(self: &Arc<Self>, key: &str) -> usize {
        {
            let mut guard = self.credential.write().await;
            *guard = key.trim().to_string();
        }
        info!(configured = !key.trim().is_empty(), "🔑 Vendor credential updated");

        // Configs come from the same take, so a chart registered meanwhile
        // is either carried over or left in place.
        let old = self.take_charts().await;
        let configs: Vec<ChartConfig> = old.iter().map(|c| c.config.clone()).collect();
        drop(old);

        self.register_all(configs).await.len()
    }

    // ── Registry ──────────────────────────────────────────────────────────────

    /// Creates a chart instance and starts its poller.
    pub async fn register_chart(self: &Arc<Self>, config: ChartConfig) -> Uuid {
        let id = Uuid::new_v4();
        let snapshot = Arc::new(RwLock::new(ChartSnapshot::default()));

        info!(chart_id = %id, symbol = %config.symbol, "📈 Chart registered");
        self.broadcast(&WsEvent::ChartRegistered { chart_id: id, config: Box::new(config.clone()) });

        let task = poller::spawn(Arc::clone(self), id, config.clone(), Arc::clone(&snapshot));
        self.charts.write().await.push(ChartInstance { id, config, snapshot, task });
        id
    }

    /// Tears down one chart.  Returns its config if it existed.
    pub async fn remove_chart(&self, id: Uuid) -> Option<ChartConfig> {
        let removed = {
            let mut charts = self.charts.write().await;
            let idx = charts.iter().position(|c| c.id == id)?;
            charts.remove(idx)
        };

        let config = removed.config.clone();
        drop(removed);

        info!(chart_id = %id, symbol = %config.symbol, "🗑️ Chart removed");
        self.broadcast(&WsEvent::ChartRemoved { chart_id: id, symbol: config.symbol.clone() });
        Some(config)
    }

    /// Tears down every chart, then registers `configs` in order.
    pub async fn replace_charts(self: &Arc<Self>, configs: Vec<ChartConfig>) -> Vec<Uuid> {
        drop(self.take_charts().await);
        self.register_all(configs).await
    }

    /// Empties the registry under one write lock.  Pollers stop when the
    /// returned instances are dropped.
    async fn take_charts(&self) -> Vec<ChartInstance> {
        let old: Vec<ChartInstance> = std::mem::take(&mut *self.charts.write().await);
        for instance in &old {
            self.broadcast(&WsEvent::ChartRemoved {
                chart_id: instance.id,
                symbol:   instance.config.symbol.clone(),
            });
        }
        old
    }

    async fn register_all(self: &Arc<Self>, configs: Vec<ChartConfig>) -> Vec<Uuid> {
        let mut ids = Vec::with_capacity(configs.len());
        for config in configs {
            ids.push(self.register_chart(config).await);
        }

        self.broadcast(&WsEvent::ChartsReloaded { count: ids.len() });
        ids
    }

    pub async fn chart_count(&self) -> usize {
        self.charts.read().await.len()
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    /// Every chart in registration order, without frames.
    pub async fn list_charts(&self) -> Vec<ChartView> {
        let charts = self.charts.read().await;
        let mut views = Vec::with_capacity(charts.len());
        for instance in charts.iter() {
            let mut view = self.view(instance).await;
            view.snapshot.frame = None;
            views.push(view);
        }
        views
    }

    /// One chart including its last frame.
    pub async fn chart(&self, id: Uuid) -> Option<ChartView> {
        let charts = self.charts.read().await;
        let instance = charts.iter().find(|c| c.id == id)?;
        Some(self.view(instance).await)
    }

    async fn view(&self, instance: &ChartInstance) -> ChartView {
        let snapshot = instance.snapshot.read().await.clone();
        ChartView {
            id:           instance.id,
            config:       instance.config.clone(),
            anchor:       instance.config.position.anchor(),
            classic_link: instance.config.classic_link(),
            stale:        snapshot.is_stale(Utc::now(), self.config.stale_after),
            snapshot,
        }
    }
}

/// Convenience type alias
pub type SharedState = Arc<AppState>;

pub fn build_state(config: Config) -> SharedState {
    Arc::new(AppState::new(config))
}
