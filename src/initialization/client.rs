//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

/// Initializes the shared HTTP client.
///
/// Every outbound call goes through this client, so the per-request
/// timeout configured here bounds how long a hung provider can stall a
/// batch.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(timeout_seconds: u64) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = reqwest::ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?;
    Ok(Arc::new(client))
}
