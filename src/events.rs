//! # events
//!
//! Defines [`WsEvent`] — every event pushed to overlay clients connected to
//! `/ws/charts`.
//!
//! Events are serialised to a JSON `String` before they go on the
//! `tokio::sync::broadcast` channel, so receivers never need `RenderFrame:
//! Clone` bounds on the channel type.

use serde::Serialize;
use uuid::Uuid;

use crate::models::{ChartConfig, RenderFrame};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WsEvent {
    /// A chart instance was created and its poller started.
    ChartRegistered {
        chart_id: Uuid,
        config:   Box<ChartConfig>,
    },

    /// A chart instance was torn down.
    ChartRemoved {
        chart_id: Uuid,
        symbol:   String,
    },

    /// A tick produced a fresh frame.
    FrameUpdated {
        chart_id:          Uuid,
        frame:             Box<RenderFrame>,
        secondary_warning: Option<String>,
    },

    /// A tick failed; the previous frame stays up.
    ChartError {
        chart_id: Uuid,
        symbol:   String,
        kind:     &'static str,
        error:    String,
    },

    /// A tick was skipped because no vendor credential is configured.
    AwaitingCredential {
        chart_id: Uuid,
        symbol:   String,
    },

    /// Credential or layout changed and every chart was recreated.
    ChartsReloaded {
        count: usize,
    },
}

impl WsEvent {
    /// Convert to a JSON string for a WebSocket text frame.
    #[inline]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| r#"{"event":"SERIALIZATION_ERROR"}"#.to_string())
    }
}
