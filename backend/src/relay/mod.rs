//! Client glue for the remote persistence/email relay.
//!
//! Forwarding is strictly best-effort: the local record is the source of
//! truth for completion, and a failed or slow relay never blocks the
//! operator. The relay itself persists the file under its dated folder tree
//! and sends the email; none of that is this service's concern.

use crate::config::AppConfig;
use common::relay::{RelayPayload, RelayResponse};
use std::time::Duration;

/// Sends the completed contract to the relay and returns its response.
///
/// The client carries a short fixed timeout so an unreachable endpoint
/// cannot stall the background task indefinitely; a timeout is reported the
/// same way as any other forward failure.
pub async fn forward_contract(
    config: &AppConfig,
    payload: &RelayPayload,
) -> Result<RelayResponse, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.relay_timeout_secs))
        .build()
        .map_err(|e| e.to_string())?;

    let url = format!(
        "{}/api/contracts",
        config.relay_endpoint.trim_end_matches('/')
    );
    let response = client
        .post(&url)
        .json(payload)
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !response.status().is_success() {
        return Err(format!("relay returned {}", response.status()));
    }

    let body: RelayResponse = response.json().await.map_err(|e| e.to_string())?;
    if !body.success {
        return Err("relay reported failure".to_string());
    }
    Ok(body)
}
