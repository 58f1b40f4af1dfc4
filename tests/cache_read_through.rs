//! Tests for the read-through cache around domain checks.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use listing_check::error_handling::ProcessingStats;
use listing_check::matching::MatchType;
use listing_check::models::Listing;
use listing_check::places::ListingProvider;
use listing_check::storage::{check_domain, clear_cache, get_cached_check};

#[path = "helpers.rs"]
mod helpers;

use helpers::{create_test_pool, insert_match, test_listing};

const SEVEN_DAYS: Duration = Duration::from_secs(7 * 24 * 3600);

/// Provider double that counts lookups and returns a fixed response.
struct CountingProvider {
    calls: AtomicUsize,
    response: Option<Listing>,
    fail: bool,
}

impl CountingProvider {
    fn returning(response: Option<Listing>) -> Self {
        CountingProvider {
            calls: AtomicUsize::new(0),
            response,
            fail: false,
        }
    }

    fn failing() -> Self {
        CountingProvider {
            calls: AtomicUsize::new(0),
            response: None,
            fail: true,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ListingProvider for CountingProvider {
    async fn search_listing(&self, _domain: &str) -> Result<Option<Listing>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("simulated provider outage");
        }
        Ok(self.response.clone())
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[tokio::test]
async fn test_fresh_cache_hit_skips_provider() {
    let pool = create_test_pool().await;
    let stats = ProcessingStats::new();
    let listing = test_listing("Acme Plumbing", MatchType::Website, Some("https://acme.com"));
    insert_match(&pool, "acme.com", listing.clone(), now_ms()).await;

    let provider = CountingProvider::returning(None);
    let result = check_domain(&pool, &provider, None, &stats, "acme.com", SEVEN_DAYS)
        .await
        .expect("check should succeed");

    assert!(result.from_cache);
    assert_eq!(result.listing, Some(listing));
    assert_eq!(provider.call_count(), 0, "fresh row must not hit the provider");
}

#[tokio::test]
async fn test_stale_row_triggers_recheck_and_writeback() {
    let pool = create_test_pool().await;
    let stats = ProcessingStats::new();
    let old_checked_at = now_ms() - (8 * 24 * 3600 * 1000);
    insert_match(
        &pool,
        "acme.com",
        test_listing("Old Acme", MatchType::Name, None),
        old_checked_at,
    )
    .await;

    let fresh_listing = test_listing("Acme Plumbing", MatchType::Website, Some("https://acme.com"));
    let provider = CountingProvider::returning(Some(fresh_listing.clone()));
    let result = check_domain(&pool, &provider, None, &stats, "acme.com", SEVEN_DAYS)
        .await
        .expect("check should succeed");

    assert!(!result.from_cache);
    assert_eq!(provider.call_count(), 1);
    assert_eq!(result.listing, Some(fresh_listing.clone()));

    // The row was overwritten with the fresh result
    let cached = get_cached_check(&pool, "acme.com")
        .await
        .expect("cache read should succeed")
        .expect("row should exist");
    assert_eq!(cached.listing, Some(fresh_listing));
    assert!(cached.checked_at > old_checked_at);
}

#[tokio::test]
async fn test_zero_freshness_forces_recheck() {
    let pool = create_test_pool().await;
    let stats = ProcessingStats::new();
    insert_match(
        &pool,
        "acme.com",
        test_listing("Acme Plumbing", MatchType::Website, None),
        now_ms(),
    )
    .await;

    let provider = CountingProvider::returning(None);
    let result = check_domain(&pool, &provider, None, &stats, "acme.com", Duration::ZERO)
        .await
        .expect("check should succeed");

    assert_eq!(provider.call_count(), 1, "freshness 0 must bypass the cache");
    assert!(!result.from_cache);
    assert!(result.listing.is_none());
}

#[tokio::test]
async fn test_miss_writes_row_even_when_nothing_found() {
    let pool = create_test_pool().await;
    let stats = ProcessingStats::new();

    let provider = CountingProvider::returning(None);
    let result = check_domain(&pool, &provider, None, &stats, "unknown.com", SEVEN_DAYS)
        .await
        .expect("check should succeed");
    assert!(result.listing.is_none());

    // A second check within the window is served from the cache
    let result2 = check_domain(&pool, &provider, None, &stats, "unknown.com", SEVEN_DAYS)
        .await
        .expect("check should succeed");
    assert!(result2.from_cache);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_provider_error_propagates_and_keeps_stale_row() {
    let pool = create_test_pool().await;
    let stats = ProcessingStats::new();
    let old_checked_at = now_ms() - (8 * 24 * 3600 * 1000);
    let stale = test_listing("Acme Plumbing", MatchType::Website, None);
    insert_match(&pool, "acme.com", stale.clone(), old_checked_at).await;

    let provider = CountingProvider::failing();
    let result = check_domain(&pool, &provider, None, &stats, "acme.com", SEVEN_DAYS).await;
    assert!(result.is_err());

    // The stale row survives so a later run can retry
    let cached = get_cached_check(&pool, "acme.com")
        .await
        .expect("cache read should succeed")
        .expect("row should still exist");
    assert_eq!(cached.listing, Some(stale));
    assert_eq!(cached.checked_at, old_checked_at);
}

#[tokio::test]
async fn test_clear_cache_single_domain_and_all() {
    let pool = create_test_pool().await;
    insert_match(
        &pool,
        "acme.com",
        test_listing("Acme Plumbing", MatchType::Website, None),
        now_ms(),
    )
    .await;
    insert_match(
        &pool,
        "other.com",
        test_listing("Other Shop", MatchType::Name, None),
        now_ms(),
    )
    .await;

    let removed = clear_cache(&pool, Some("acme.com"))
        .await
        .expect("clear should succeed");
    assert_eq!(removed, 1);
    assert!(get_cached_check(&pool, "acme.com").await.unwrap().is_none());
    assert!(get_cached_check(&pool, "other.com").await.unwrap().is_some());

    let removed = clear_cache(&pool, None).await.expect("clear should succeed");
    assert_eq!(removed, 1);
}
