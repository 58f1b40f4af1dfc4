//! DataForSEO whois-overview client.
//!
//! Calls `/v3/domain_analytics/whois/live` with Basic auth and maps the
//! response loosely into nullable metrics. The provider has shipped
//! several response shapes for this endpoint, so extraction probes a few
//! known field paths instead of binding to a strict schema.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::config::DATAFORSEO_API_BASE_URL;
use crate::models::DomainMetrics;

/// What the whois overview yields after tolerant extraction.
#[derive(Debug, Clone, Default)]
pub struct WhoisOverview {
    pub created_at: Option<DateTime<Utc>>,
    pub metrics: DomainMetrics,
}

impl WhoisOverview {
    /// Domain age in fractional years, when a creation date was present.
    pub fn age_years(&self, now: DateTime<Utc>) -> Option<f64> {
        self.created_at
            .map(|created| (now - created).num_seconds() as f64 / (365.25 * 24.0 * 3600.0))
    }
}

pub struct DataForSeoClient {
    client: Arc<reqwest::Client>,
    login: String,
    password: String,
    base_url: String,
}

impl DataForSeoClient {
    pub fn new(client: Arc<reqwest::Client>, login: String, password: String) -> Self {
        DataForSeoClient {
            client,
            login,
            password,
            base_url: DATAFORSEO_API_BASE_URL.to_string(),
        }
    }

    /// Overrides the endpoint base URL. Used by tests to point at a local server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Fetches the whois overview for a domain.
    ///
    /// Returns `Ok(None)` when the provider responds without a usable
    /// task item; transport and status errors propagate.
    pub async fn fetch_whois_overview(&self, domain: &str) -> Result<Option<WhoisOverview>> {
        let body = serde_json::json!([{ "target": domain }]);

        let response = self
            .client
            .post(format!("{}/domain_analytics/whois/live", self.base_url))
            .basic_auth(&self.login, Some(&self.password))
            .json(&body)
            .send()
            .await
            .context("DataForSEO whois request failed")?
            .error_for_status()
            .context("DataForSEO whois returned an error status")?;

        let data: Value = response
            .json()
            .await
            .context("Failed to decode DataForSEO whois response")?;

        Ok(extract_overview(&data))
    }
}

/// Digs the first task item out of the response envelope.
fn first_item(data: &Value) -> Option<&Value> {
    data.get("tasks")?
        .get(0)?
        .get("result")?
        .get(0)?
        .get("items")?
        .get(0)
}

fn extract_overview(data: &Value) -> Option<WhoisOverview> {
    let item = first_item(data)?;

    let created_at = ["created_datetime", "creation_date"]
        .iter()
        .filter_map(|key| item.get(*key))
        .filter_map(Value::as_str)
        .find_map(parse_provider_datetime);

    let metrics = DomainMetrics {
        domain_rating: first_f64(item, &[
            &["registrar_info", "domain_rank"],
            &["registrar_info", "trust_score"],
        ]),
        semrush_rank: first_i64(item, &[
            &["registrar_info", "rank"],
            &["registrar_info", "alexa_rank"],
        ]),
        facebook_shares: first_i64(item, &[
            &["social_metrics", "facebook", "shares"],
            &["social_metrics", "total_shares"],
        ]),
        ahrefs_rank: first_i64(item, &[
            &["backlinks_info", "backlinks_count"],
            &["backlinks_info", "referring_domains"],
        ]),
    };

    Some(WhoisOverview {
        created_at,
        metrics,
    })
}

fn dig<'a>(item: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = item;
    for key in path {
        current = current.get(key)?;
    }
    Some(current)
}

fn first_f64(item: &Value, paths: &[&[&str]]) -> Option<f64> {
    paths
        .iter()
        .filter_map(|path| dig(item, path))
        .find_map(Value::as_f64)
}

fn first_i64(item: &Value, paths: &[&[&str]]) -> Option<i64> {
    paths
        .iter()
        .filter_map(|path| dig(item, path))
        .find_map(Value::as_i64)
}

/// Parses the datetime formats this provider has been seen to emit.
fn parse_provider_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S %:z") {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(item: Value) -> Value {
        serde_json::json!({
            "tasks": [{ "result": [{ "items": [item] }] }]
        })
    }

    #[test]
    fn test_extract_overview_full_item() {
        let data = envelope(serde_json::json!({
            "created_datetime": "2015-06-01 10:30:00 +00:00",
            "registrar_info": { "domain_rank": 42.0, "rank": 12345 },
            "social_metrics": { "facebook": { "shares": 87 } },
            "backlinks_info": { "backlinks_count": 990 }
        }));

        let overview = extract_overview(&data).unwrap();
        assert!(overview.created_at.is_some());
        assert_eq!(overview.metrics.domain_rating, Some(42.0));
        assert_eq!(overview.metrics.semrush_rank, Some(12345));
        assert_eq!(overview.metrics.facebook_shares, Some(87));
        assert_eq!(overview.metrics.ahrefs_rank, Some(990));
    }

    #[test]
    fn test_extract_overview_fallback_paths() {
        let data = envelope(serde_json::json!({
            "registrar_info": { "trust_score": 7.5, "alexa_rank": 100 },
            "social_metrics": { "total_shares": 3 },
            "backlinks_info": { "referring_domains": 50 }
        }));

        let overview = extract_overview(&data).unwrap();
        assert!(overview.created_at.is_none());
        assert_eq!(overview.metrics.domain_rating, Some(7.5));
        assert_eq!(overview.metrics.semrush_rank, Some(100));
        assert_eq!(overview.metrics.facebook_shares, Some(3));
        assert_eq!(overview.metrics.ahrefs_rank, Some(50));
    }

    #[test]
    fn test_extract_overview_missing_item() {
        let data = serde_json::json!({ "tasks": [{ "result": [] }] });
        assert!(extract_overview(&data).is_none());
    }

    #[test]
    fn test_age_years() {
        let overview = WhoisOverview {
            created_at: Some(
                DateTime::parse_from_rfc3339("2020-01-01T00:00:00Z")
                    .unwrap()
                    .with_timezone(&Utc),
            ),
            metrics: DomainMetrics::default(),
        };
        let now = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let age = overview.age_years(now).unwrap();
        assert!((age - 5.0).abs() < 0.05, "age was {age}");
    }

    #[test]
    fn test_parse_provider_datetime_formats() {
        assert!(parse_provider_datetime("2019-11-15T12:57:46Z").is_some());
        assert!(parse_provider_datetime("2019-11-15 12:57:46 +00:00").is_some());
        assert!(parse_provider_datetime("2019-11-15 12:57:46").is_some());
        assert!(parse_provider_datetime("2019-11-15").is_some());
        assert!(parse_provider_datetime("not a date").is_none());
    }
}
