//! # gexlens — gamma-exposure overlay service
//!
//! ```text
//!  ┌─────────────┐  GET /{sym}/classic/zero   ┌──────────────────────────────┐
//!  │  gexbot API │ ◀───────────────────────── │ poller (one per chart)       │
//!  │             │  GET /{sym}/state/gamma    │  └─ engine::pipeline         │
//!  └─────────────┘                            │      strike_filter · axis ·  │
//!                                             │      interpolate · format    │
//!                                             │                              │
//!                                             │ AppState                     │
//!                                             │ ├─ credential                │
//!                                             │ ├─ charts[] → ChartSnapshot  │
//!                                             │ └─ broadcast_tx ───────────┐ │
//!                                             └────────────────────────────┘ │
//!  ┌─────────────┐  ws://host/ws/charts  ◀───────────────────────────────────┘
//!  │  Overlay    │  GET  /api/charts/:id/frame
//!  └─────────────┘  POST /api/layout · /api/credential
//! ```

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod auth;
mod config;
mod engine;
mod error;
mod events;
mod feed;
mod layout;
mod models;
mod poller;
mod routes;
mod state;

use config::Config;
use state::build_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Load .env ──────────────────────────────────────────────────────────
    dotenvy::dotenv().ok();

    // ── 2. Structured logging ─────────────────────────────────────────────────
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("gexlens=debug".parse()?)
                .add_directive("tower_http=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    info!(r#"

  ╔═══════════════════════════════════════════════════════╗
  ║              GEXLENS — Gamma Overlay                  ║
  ║  Filter · Scale · Interpolate · Frame                 ║
  ╚═══════════════════════════════════════════════════════╝"#);

    // ── 3. Configuration & shared state ───────────────────────────────────────
    let config = Config::from_env()?;
    let addr = config.bind_addr;
    let page = config.overlay_page_url.clone();
    let state = build_state(config);

    if !state.has_credential().await {
        warn!("GEXBOT_API_KEY not set — charts will wait until POST /api/credential");
    }

    // ── 4. Boot layout ────────────────────────────────────────────────────────
    if let Some(url) = page {
        let ids = state.replace_charts(layout::configs_for_page(&url)).await;
        if ids.is_empty() {
            warn!(%url, "No chart preset for OVERLAY_PAGE_URL");
        } else {
            info!(%url, charts = ids.len(), "🗺️ Boot layout registered");
        }
    }

    // ── 5. Router ─────────────────────────────────────────────────────────────
    let app = routes::router(state);

    // ── 6. Bind & Serve ───────────────────────────────────────────────────────
    info!(?addr, "🚀 gexlens server starting");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
