//! Ahrefs domain-rating client (Bearer-token auth).

use anyhow::{Context, Result};
use serde_json::Value;
use std::sync::Arc;

use crate::config::AHREFS_API_BASE_URL;

pub struct AhrefsClient {
    client: Arc<reqwest::Client>,
    api_key: String,
    base_url: String,
}

impl AhrefsClient {
    pub fn new(client: Arc<reqwest::Client>, api_key: String) -> Self {
        AhrefsClient {
            client,
            api_key,
            base_url: AHREFS_API_BASE_URL.to_string(),
        }
    }

    /// Overrides the endpoint base URL. Used by tests to point at a local server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fetches the domain rating for a domain.
    ///
    /// Returns `Ok(None)` when the response carries no rating; transport
    /// and status errors propagate.
    pub async fn fetch_domain_rating(&self, domain: &str) -> Result<Option<f64>> {
        let response = self
            .client
            .get(format!("{}/domain-rating", self.base_url))
            .query(&[("target", domain)])
            .header("Accept", "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await
            .context("Ahrefs domain-rating request failed")?
            .error_for_status()
            .context("Ahrefs domain-rating returned an error status")?;

        let data: Value = response
            .json()
            .await
            .context("Failed to decode Ahrefs response")?;

        Ok(extract_domain_rating(&data))
    }
}

/// The v3 API nests the rating (`{"domain_rating": {"domain_rating": 74.5}}`);
/// older responses carried it at the top level.
fn extract_domain_rating(data: &Value) -> Option<f64> {
    match data.get("domain_rating") {
        Some(Value::Object(inner)) => inner.get("domain_rating").and_then(Value::as_f64),
        Some(value) => value.as_f64(),
        None => None,
    }
}
