//! # models::snapshot
//!
//! [`ChartSnapshot`] — the "last known data" a chart instance keeps between
//! ticks.  It is the only state that survives a tick: a successful tick
//! replaces the frame, a failed one only raises the error indicator so the
//! previous frame stays on screen.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::engine::pipeline::BuiltFrame;
use crate::error::FeedError;
use crate::models::RenderFrame;

/// Text shown on the widget while the last tick failed.
pub const ERROR_INDICATOR: &str = "API Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartStatus {
    /// Registered, first tick not finished yet.
    Loading,
    /// No vendor credential configured; nothing is fetched.
    AwaitingCredential,
    /// Last tick produced a frame.
    Live,
    /// Last tick failed; any previous frame is still shown.
    Error,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartSnapshot {
    pub status:            ChartStatus,
    pub frame:             Option<RenderFrame>,
    pub last_success:      Option<DateTime<Utc>>,
    /// `"API Error: …"` while the last tick failed.
    pub error:             Option<String>,
    pub secondary_warning: Option<String>,
    pub ticks:             u64,
    pub failures:          u64,
}

impl Default for ChartSnapshot {
    fn default() -> Self {
        Self {
            status:            ChartStatus::Loading,
            frame:             None,
            last_success:      None,
            error:             None,
            secondary_warning: None,
            ticks:             0,
            failures:          0,
        }
    }
}

impl ChartSnapshot {
    /// Records the outcome of one tick.
    pub fn apply(&mut self, outcome: Result<BuiltFrame, FeedError>, now: DateTime<Utc>) {
        self.ticks += 1;

        match outcome {
            Ok(built) => {
                self.status = ChartStatus::Live;
                self.frame = Some(built.frame);
                self.last_success = Some(now);
                self.error = None;
                self.secondary_warning = built.secondary_warning.map(|e| e.to_string());
            }
            Err(e) => {
                self.status = ChartStatus::Error;
                self.error = Some(format!("{ERROR_INDICATOR}: {e}"));
                self.failures += 1;
            }
        }
    }

    pub fn await_credential(&mut self) {
        self.status = ChartStatus::AwaitingCredential;
    }

    /// `true` once a frame exists and has not been refreshed for `threshold`.
    pub fn is_stale(&self, now: DateTime<Utc>, threshold: Duration) -> bool {
        match self.last_success {
            Some(at) => (now - at).to_std().map(|age| age > threshold).unwrap_or(false),
            None => false,
        }
    }
}
