//! # routes::charts
//!
//! Chart registry endpoints used by the overlay.
//!
//! | Method | Path                    | Description                                   |
//! |--------|-------------------------|-----------------------------------------------|
//! | GET    | `/api/charts`           | All charts with status (no frames)            |
//! | POST   | `/api/charts`           | Register one chart from a [`ChartConfig`]     |
//! | GET    | `/api/charts/:id`       | One chart including its last frame            |
//! | GET    | `/api/charts/:id/frame` | Last frame only                               |
//! | DELETE | `/api/charts/:id`       | Tear the chart down                           |
//! | POST   | `/api/layout`           | Replace all charts with a page's preset       |

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{error::AppError, layout, models::ChartConfig, state::SharedState};

// ─── GET /api/charts ──────────────────────────────────────────────────────────

pub async fn list_charts(State(state): State<SharedState>) -> impl IntoResponse {
    let charts = state.list_charts().await;
    Json(json!({
        "ok":     true,
        "count":  charts.len(),
        "charts": charts,
    }))
}

// ─── POST /api/charts ─────────────────────────────────────────────────────────

pub async fn create_chart(
    State(state): State<SharedState>,
    Json(config): Json<ChartConfig>,
) -> Result<impl IntoResponse, AppError> {
    if config.symbol.trim().is_empty() {
        return Err(AppError::BadRequest("symbol must not be empty".into()));
    }

    let id = state.register_chart(config).await;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "chart_id": id })),
    ))
}

// ─── GET /api/charts/:id ──────────────────────────────────────────────────────

pub async fn get_chart(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let chart = state
        .chart(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No chart with id {id}")))?;

    Ok(Json(json!({ "ok": true, "chart": chart })))
}

// ─── GET /api/charts/:id/frame ────────────────────────────────────────────────

pub async fn get_frame(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let chart = state
        .chart(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No chart with id {id}")))?;

    let frame = chart
        .snapshot
        .frame
        .ok_or_else(|| AppError::NotFound(format!("Chart {id} has no frame yet")))?;

    Ok(Json(json!({
        "ok":    true,
        "stale": chart.stale,
        "error": chart.snapshot.error,
        "frame": frame,
    })))
}

// ─── DELETE /api/charts/:id ───────────────────────────────────────────────────

pub async fn delete_chart(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let config = state
        .remove_chart(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("No chart with id {id}")))?;

    Ok(Json(json!({
        "ok":      true,
        "message": format!("Chart {} removed", config.symbol),
    })))
}

// ─── POST /api/layout ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct LayoutBody {
    /// URL of the charting page the overlay is running on.
    pub url: String,
}

pub async fn apply_layout(
    State(state): State<SharedState>,
    Json(body): Json<LayoutBody>,
) -> impl IntoResponse {
    let configs = layout::configs_for_page(&body.url);
    let ids = state.replace_charts(configs).await;

    tracing::info!(url = %body.url, charts = ids.len(), "🗺️ Layout applied");

    Json(json!({
        "ok":        true,
        "chart_ids": ids,
    }))
}
