// libs/appointment-cell/src/services/sync.rs
//
// Outbound notifications to the Sesami scheduling service. Local changes to
// an externally-sourced appointment are pushed back on a best-effort basis:
// the result is logged and never surfaces to the caller.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;

/// HTTP request timeout for a single notification attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncAction {
    Update,
    Cancel,
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncAction::Update => write!(f, "update"),
            SyncAction::Cancel => write!(f, "cancel"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Sesami returned HTTP {0}")]
    HttpStatus(u16),
}

#[derive(Clone)]
pub struct SesamiSyncClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SesamiSyncClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");

        Self {
            client,
            base_url: config.sesami_api_url.clone(),
            api_key: config.sesami_api_key.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.base_url.is_empty()
    }

    /// Push one change notification for an external booking.
    pub async fn notify(&self, booking_id: &str, action: SyncAction) -> Result<(), SyncError> {
        if !self.is_configured() {
            debug!(
                "Sesami API not configured, skipping {} notification for booking {}",
                action, booking_id
            );
            return Ok(());
        }

        let payload = json!({
            "booking_id": booking_id,
            "action": action,
        });

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SyncError::HttpStatus(response.status().as_u16()));
        }

        info!("Synced {} for booking {} to Sesami", action, booking_id);
        Ok(())
    }
}
