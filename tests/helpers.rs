// Shared test helpers for database setup and test data creation.

use sqlx::SqlitePool;

use listing_check::matching::MatchType;
use listing_check::models::{DomainCheckResult, Listing};
use listing_check::run_migrations;
use listing_check::storage::upsert_check;

/// Creates a test database pool with migrations applied.
/// Uses an in-memory database for fast test execution.
#[allow(dead_code)] // Used by other test files
pub async fn create_test_pool() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

/// A listing for test rows; the caller picks the match type.
#[allow(dead_code)]
pub fn test_listing(name: &str, match_type: MatchType, website: Option<&str>) -> Listing {
    Listing {
        business_name: name.to_string(),
        address: "123 Main St, Springfield".to_string(),
        rating: 4.2,
        place_type: "Plumber".to_string(),
        place_id: format!("place-{}", name.to_lowercase().replace(' ', "-")),
        match_type,
        website_url: website.map(String::from),
    }
}

/// Inserts a cached check row with a matched listing.
#[allow(dead_code)]
pub async fn insert_match(
    pool: &SqlitePool,
    domain: &str,
    listing: Listing,
    checked_at: i64,
) {
    let result = DomainCheckResult {
        domain: domain.to_string(),
        listing: Some(listing),
        metrics: None,
        domain_age_years: None,
        checked_at,
        from_cache: false,
    };
    upsert_check(pool, &result)
        .await
        .expect("Failed to insert test row");
}

/// Inserts a cached check row recording that no listing was found.
#[allow(dead_code)]
pub async fn insert_not_found(pool: &SqlitePool, domain: &str, checked_at: i64) {
    upsert_check(pool, &DomainCheckResult::not_found(domain, checked_at))
        .await
        .expect("Failed to insert test row");
}
