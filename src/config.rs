//! # config — service configuration from environment variables
//!
//! | Variable               | Default                  | Description                              |
//! |------------------------|--------------------------|------------------------------------------|
//! | `BIND_ADDR`            | `127.0.0.1:3000`         | Address axum listens on                  |
//! | `GEXBOT_API_KEY`       | *(empty)*                | Vendor credential; empty → charts wait   |
//! | `GEXBOT_BASE_URL`      | `https://api.gexbot.com` | Vendor API base                          |
//! | `POLL_INTERVAL_SECS`   | `5`                      | Refresh tick per chart                   |
//! | `STALE_AFTER_SECS`     | `30`                     | Age after which a frame is flagged stale |
//! | `REQUEST_TIMEOUT_SECS` | `5`                      | Per-request timeout                      |
//! | `OVERLAY_PAGE_URL`     | *(unset)*                | Page whose layout is registered at boot  |
//! | `OVERLAY_TOKEN`        | *(unset)*                | Required `X-Overlay-Token` when set      |

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

pub const DEFAULT_BASE_URL: &str = "https://api.gexbot.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr:        SocketAddr,
    /// Initial vendor credential; can be replaced at runtime.
    pub api_key:          String,
    pub base_url:         String,
    pub poll_interval:    Duration,
    pub stale_after:      Duration,
    pub request_timeout:  Duration,
    pub overlay_page_url: Option<String>,
    pub overlay_token:    Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .context("BIND_ADDR must be a socket address")?;

        Ok(Self {
            bind_addr,
            api_key:          std::env::var("GEXBOT_API_KEY").unwrap_or_default().trim().to_string(),
            base_url:         std::env::var("GEXBOT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            poll_interval:    secs_from_env("POLL_INTERVAL_SECS", 5)?,
            stale_after:      secs_from_env("STALE_AFTER_SECS", 30)?,
            request_timeout:  secs_from_env("REQUEST_TIMEOUT_SECS", 5)?,
            overlay_page_url: non_empty_env("OVERLAY_PAGE_URL"),
            overlay_token:    non_empty_env("OVERLAY_TOKEN"),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr:        SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_key:          String::new(),
            base_url:         DEFAULT_BASE_URL.to_string(),
            poll_interval:    Duration::from_secs(5),
            stale_after:      Duration::from_secs(30),
            request_timeout:  Duration::from_secs(5),
            overlay_page_url: None,
            overlay_token:    None,
        }
    }
}

fn secs_from_env(name: &str, default: u64) -> anyhow::Result<Duration> {
    let secs: u64 = match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} must be a whole number of seconds"))?,
        Err(_) => default,
    };

    if secs == 0 {
        anyhow::bail!("{name} must be greater than zero");
    }
    Ok(Duration::from_secs(secs))
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
