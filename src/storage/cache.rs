//! Read-through domain-check cache.
//!
//! One row per domain. A lookup within the freshness window is served
//! straight from the table without touching any provider; anything older
//! (or absent) triggers a fresh lookup and a write-back. Writes are
//! unsynchronized last-write-wins, which is acceptable for a single-user
//! tool.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Pool, Row, Sqlite};
use std::time::Duration;

use crate::enrichment::Enrichment;
use crate::error_handling::{DatabaseError, ErrorType, ProcessingStats};
use crate::models::{DomainCheckResult, DomainMetrics, Listing};
use crate::places::ListingProvider;

/// Loads the cached check row for a domain, if any.
pub async fn get_cached_check(
    pool: &Pool<Sqlite>,
    domain: &str,
) -> Result<Option<DomainCheckResult>, DatabaseError> {
    let row = sqlx::query(
        "SELECT listing, checked_at, domain_age_years, domain_rating,
                semrush_rank, facebook_shares, ahrefs_rank
         FROM domain_checks WHERE domain = ?",
    )
    .bind(domain)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let listing_json: Option<String> = row.get("listing");
    let listing: Option<Listing> = match listing_json {
        Some(json) => match serde_json::from_str(&json) {
            Ok(listing) => Some(listing),
            Err(e) => {
                // A row written by an older schema; treat as a cache miss
                // for the listing but keep the rest of the row usable
                log::warn!("Discarding unreadable cached listing for {domain}: {e}");
                None
            }
        },
        None => None,
    };

    let metrics = DomainMetrics {
        domain_rating: row.get("domain_rating"),
        semrush_rank: row.get("semrush_rank"),
        facebook_shares: row.get("facebook_shares"),
        ahrefs_rank: row.get("ahrefs_rank"),
    };

    Ok(Some(DomainCheckResult {
        domain: domain.to_string(),
        listing,
        metrics: if metrics.is_empty() {
            None
        } else {
            Some(metrics)
        },
        domain_age_years: row.get("domain_age_years"),
        checked_at: row.get("checked_at"),
        from_cache: true,
    }))
}

/// Inserts or overwrites the row for a domain. Last write wins.
pub async fn upsert_check(
    pool: &Pool<Sqlite>,
    result: &DomainCheckResult,
) -> Result<(), DatabaseError> {
    let listing_json = match &result.listing {
        Some(listing) => Some(
            serde_json::to_string(listing)
                .map_err(|e| DatabaseError::FileCreationError(e.to_string()))?,
        ),
        None => None,
    };
    let metrics = result.metrics.clone().unwrap_or_default();

    sqlx::query(
        "INSERT INTO domain_checks
            (domain, listing, checked_at, domain_age_years, domain_rating,
             semrush_rank, facebook_shares, ahrefs_rank)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(domain) DO UPDATE SET
            listing = excluded.listing,
            checked_at = excluded.checked_at,
            domain_age_years = excluded.domain_age_years,
            domain_rating = excluded.domain_rating,
            semrush_rank = excluded.semrush_rank,
            facebook_shares = excluded.facebook_shares,
            ahrefs_rank = excluded.ahrefs_rank",
    )
    .bind(&result.domain)
    .bind(listing_json)
    .bind(result.checked_at)
    .bind(result.domain_age_years)
    .bind(metrics.domain_rating)
    .bind(metrics.semrush_rank)
    .bind(metrics.facebook_shares)
    .bind(metrics.ahrefs_rank)
    .execute(pool)
    .await?;

    Ok(())
}

/// Deletes cached rows; all of them, or just one domain's.
/// Returns the number of rows removed.
pub async fn clear_cache(
    pool: &Pool<Sqlite>,
    domain: Option<&str>,
) -> Result<u64, DatabaseError> {
    let result = match domain {
        Some(domain) => {
            sqlx::query("DELETE FROM domain_checks WHERE domain = ?")
                .bind(domain)
                .execute(pool)
                .await?
        }
        None => sqlx::query("DELETE FROM domain_checks").execute(pool).await?,
    };
    Ok(result.rows_affected())
}

/// Checks one domain through the cache.
///
/// A cached row younger than `freshness` is returned without issuing any
/// provider call. Otherwise the listing provider (and optional
/// enrichment) runs and the row is written back with the current
/// timestamp. Lookup errors propagate to the caller, which decides
/// whether to record a null-listing result; the stale row is left in
/// place so a later run can retry.
pub async fn check_domain(
    pool: &Pool<Sqlite>,
    provider: &dyn ListingProvider,
    enrichment: Option<&Enrichment>,
    stats: &ProcessingStats,
    domain: &str,
    freshness: Duration,
) -> Result<DomainCheckResult> {
    if !freshness.is_zero() {
        match get_cached_check(pool, domain).await {
            Ok(Some(cached)) => {
                let age_ms = Utc::now().timestamp_millis() - cached.checked_at;
                if age_ms >= 0 && (age_ms as u128) < freshness.as_millis() {
                    log::debug!("Cache hit for {domain} (age {}s)", age_ms / 1000);
                    return Ok(cached);
                }
                log::debug!("Cache entry for {domain} is stale, re-checking");
            }
            Ok(None) => {}
            Err(e) => {
                // Degrade to a fresh lookup rather than failing the domain
                log::warn!("Cache read failed for {domain}: {e}");
                stats.increment_error(ErrorType::CacheReadError);
            }
        }
    }

    let listing = provider
        .search_listing(domain)
        .await
        .with_context(|| format!("Listing lookup failed for {domain}"))?;

    let mut result = DomainCheckResult {
        domain: domain.to_string(),
        listing,
        metrics: None,
        domain_age_years: None,
        checked_at: Utc::now().timestamp_millis(),
        from_cache: false,
    };

    if let Some(enrichment) = enrichment {
        let enriched = enrichment.enrich(domain, stats).await;
        result.metrics = enriched.metrics;
        result.domain_age_years = enriched.domain_age_years;
    }

    if let Err(e) = upsert_check(pool, &result).await {
        log::warn!("Failed to persist check result for {domain}: {e}");
        stats.increment_error(ErrorType::CacheWriteError);
    }

    Ok(result)
}
