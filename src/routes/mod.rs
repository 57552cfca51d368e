//! # routes
//!
//! Builds the axum [`Router`] the overlay talks to.  Every route sits behind
//! [`require_overlay_token`]; CORS is wide open because the overlay runs
//! inside a third-party charting page.

pub mod charts;
pub mod credential;
pub mod monitor;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::require_overlay_token;
use crate::state::SharedState;

use charts::{apply_layout, create_chart, delete_chart, get_chart, get_frame, list_charts};
use credential::set_credential;
use monitor::{health, ws_charts};

pub fn router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // ── Charts ────────────────────────────────────────────────────────────
        .route("/api/charts",           get(list_charts).post(create_chart))
        .route("/api/charts/:id",       get(get_chart).delete(delete_chart))
        .route("/api/charts/:id/frame", get(get_frame))
        .route("/api/layout",           post(apply_layout))
        // ── Credential ────────────────────────────────────────────────────────
        .route("/api/credential",       post(set_credential))
        // ── Monitor ───────────────────────────────────────────────────────────
        .route("/ws/charts",            get(ws_charts))
        .route("/api/health",           get(health))
        // ── Middleware ────────────────────────────────────────────────────────
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_overlay_token))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::auth::TOKEN_HEADER;
    use crate::config::Config;
    use crate::state::build_state;

    fn offline_config() -> Config {
        Config { base_url: "http://127.0.0.1:9".into(), ..Config::default() }
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let state = build_state(offline_config());
        let (status, body) = send(router(state), get_req("/api/health")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert_eq!(body["charts"], 0);
        assert_eq!(body["has_credential"], false);
    }

    #[tokio::test]
    async fn test_layout_then_list_and_delete() {
        let state = build_state(offline_config());
        let app = router(state.clone());

        let (status, body) = send(
            app.clone(),
            json_req("POST", "/api/layout", json!({ "url": "https://www.tradingview.com/chart/RwyW88xf/" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["chart_ids"].as_array().unwrap().len(), 2);

        let (_, listed) = send(app.clone(), get_req("/api/charts")).await;
        assert_eq!(listed["count"], 2);
        assert_eq!(listed["charts"][0]["config"]["symbol"], "ES_SPX");
        assert_eq!(listed["charts"][1]["anchor"]["left"], "calc(50% + 210px)");

        let id = listed["charts"][0]["id"].as_str().unwrap().to_string();
        let delete = Request::delete(format!("/api/charts/{id}")).body(Body::empty()).unwrap();
        let (status, _) = send(app.clone(), delete).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.chart_count().await, 1);

        let (status, body) = send(app, get_req(&format!("/api/charts/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_create_chart_and_frame_not_ready() {
        let state = build_state(offline_config());
        let app = router(state);

        let (status, body) = send(
            app.clone(),
            json_req(
                "POST",
                "/api/charts",
                json!({
                    "symbol":   "GLD",
                    "position": "left",
                    "window":   { "bar_levels": 10, "levels_above": 2, "levels_below": 2, "mode": "spot" },
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let id = body["chart_id"].as_str().unwrap().to_string();
        let (status, _) = send(app, get_req(&format!("/api/charts/{id}/frame"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_chart_rejects_blank_symbol() {
        let app = router(build_state(offline_config()));
        let (status, body) = send(
            app,
            json_req(
                "POST",
                "/api/charts",
                json!({
                    "symbol":   "  ",
                    "position": "right",
                    "window":   { "bar_levels": 10, "levels_above": 2, "levels_below": 2 },
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["ok"], false);
    }

    #[tokio::test]
    async fn test_credential_endpoint() {
        let state = build_state(offline_config());
        let app = router(state.clone());

        let (status, body) = send(app, json_req("POST", "/api/credential", json!({ "key": " secret " }))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["configured"], true);
        assert!(!body.to_string().contains("secret"));
        assert_eq!(state.credential().await, "secret");
    }

    #[tokio::test]
    async fn test_overlay_token_required_when_configured() {
        let state = build_state(Config { overlay_token: Some("t0k".into()), ..offline_config() });
        let app = router(state);

        let (status, _) = send(app.clone(), get_req("/api/charts")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let with_header = Request::get("/api/charts").header(TOKEN_HEADER, "t0k").body(Body::empty()).unwrap();
        let (status, _) = send(app.clone(), with_header).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(app.clone(), get_req("/api/charts?token=t0k")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(app, get_req("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_query_token_is_percent_decoded() {
        let state = build_state(Config { overlay_token: Some("a b&c/d".into()), ..offline_config() });
        let app = router(state);

        let (status, _) = send(app.clone(), get_req("/api/charts?token=a%20b%26c%2Fd")).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(app, get_req("/api/charts?token=a%20b")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
