use crate::error::{fetch_error, SyncResult};
use reqwest::Client;

/// Fetch the raw events page markup. The client carries the configured
/// timeout, so a hung server fails the run instead of stalling it.
pub async fn fetch_events_page(client: &Client, url: &str) -> SyncResult<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(&format!("Failed to fetch {}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(fetch_error(&format!(
            "Failed to fetch {}: HTTP {}",
            url,
            response.status()
        )));
    }

    response
        .text()
        .await
        .map_err(|e| fetch_error(&format!("Failed to read response from {}: {}", url, e)))
}
