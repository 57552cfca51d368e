//! # feed — gexbot HTTP client
//!
//! Two-stage fetch per tick:
//!
//! ```text
//! GET {base}/{symbol}/classic/zero?key=…   (primary — failure fails the tick)
//!        │ ok
//!        ▼
//! GET {base}/{symbol}/state/gamma?key=…    (secondary — failure is kept as a warning)
//! ```
//!
//! Bodies are returned as raw JSON; shape validation belongs to the pipeline.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::FeedError;

const PRIMARY_ENDPOINT: &str = "classic/zero";
const SECONDARY_ENDPOINT: &str = "state/gamma";

/// Outcome of the secondary stage.
#[derive(Debug, Clone, PartialEq)]
pub enum SecondaryFetch {
    /// The chart does not use a secondary channel.
    Skipped,
    Fetched(Value),
    Failed(FeedError),
}

/// Both stages of one tick: the primary body, and whatever the secondary
/// stage produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPair {
    pub primary:   Value,
    pub secondary: SecondaryFetch,
}

#[derive(Debug, Clone)]
pub struct GexFeed {
    client:   reqwest::Client,
    base_url: String,
    timeout:  Duration,
}

impl GexFeed {
    pub fn new(client: reqwest::Client, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Endpoint URL without the credential, safe to log.
    pub fn endpoint_url(&self, symbol: &str, endpoint: &str) -> String {
        format!("{}/{symbol}/{endpoint}", self.base_url)
    }

    /// Runs the primary stage, then the secondary stage if `with_secondary`.
    pub async fn fetch_pair(
        &self,
        symbol: &str,
        api_key: &str,
        with_secondary: bool,
    ) -> Result<FeedPair, FeedError> {
        let primary = self.fetch_json(symbol, PRIMARY_ENDPOINT, api_key).await?;

        let secondary = if with_secondary {
            match self.fetch_json(symbol, SECONDARY_ENDPOINT, api_key).await {
                Ok(body) => SecondaryFetch::Fetched(body),
                Err(e) => SecondaryFetch::Failed(e),
            }
        } else {
            SecondaryFetch::Skipped
        };

        Ok(FeedPair { primary, secondary })
    }

    async fn fetch_json(&self, symbol: &str, endpoint: &str, api_key: &str) -> Result<Value, FeedError> {
        let url = self.endpoint_url(symbol, endpoint);
        debug!(%url, "Fetching gexbot data");

        let resp = self
            .client
            .get(&url)
            .query(&[("key", api_key)])
            .timeout(self.timeout)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FeedError::Transport(format!("{endpoint} returned HTTP {status}: {}", body.trim())));
        }

        Ok(resp.json().await?)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────
