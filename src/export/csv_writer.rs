//! Writes matched listings from the cache to CSV.

use anyhow::{Context, Result};
use sqlx::{Pool, Row, Sqlite};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::matching::MatchType;
use crate::models::Listing;

/// Column order matches what downstream spreadsheets expect.
pub const CSV_HEADERS: [&str; 8] = [
    "Domain",
    "Business Name",
    "Address",
    "Rating",
    "Type",
    "Match Type",
    "Website URL",
    "Place ID",
];

/// Row filters for an export.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExportFilter {
    /// Only include listings matched this way
    pub match_type: Option<MatchType>,
    /// Only include rows checked at or after this epoch-millisecond timestamp
    pub since: Option<i64>,
}

/// Exports every cached row with a matched listing as CSV.
///
/// Rows without a listing (checked but nothing found) are skipped. Writes
/// to `output` when given, stdout otherwise. Returns the number of data
/// rows written.
pub async fn export_matches(
    pool: &Pool<Sqlite>,
    filter: ExportFilter,
    output: Option<&Path>,
) -> Result<u64> {
    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(CSV_HEADERS)?;

    let rows = match filter.since {
        Some(since) => {
            sqlx::query(
                "SELECT domain, listing FROM domain_checks
                 WHERE listing IS NOT NULL AND checked_at >= ?
                 ORDER BY domain",
            )
            .bind(since)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query(
                "SELECT domain, listing FROM domain_checks
                 WHERE listing IS NOT NULL
                 ORDER BY domain",
            )
            .fetch_all(pool)
            .await?
        }
    };

    let mut written = 0u64;
    for row in rows {
        let domain: String = row.get("domain");
        let listing_json: String = row.get("listing");
        let listing: Listing = match serde_json::from_str(&listing_json) {
            Ok(listing) => listing,
            Err(e) => {
                log::warn!("Skipping unreadable cached listing for {domain}: {e}");
                continue;
            }
        };

        if let Some(wanted) = filter.match_type {
            if listing.match_type != wanted {
                continue;
            }
        }

        let rating = listing.rating.to_string();
        csv.write_record([
            domain.as_str(),
            listing.business_name.as_str(),
            listing.address.as_str(),
            rating.as_str(),
            listing.place_type.as_str(),
            listing.match_type.as_str(),
            listing.website_url.as_deref().unwrap_or(""),
            listing.place_id.as_str(),
        ])?;
        written += 1;
    }

    csv.flush()?;
    log::info!("Exported {written} matched listings");
    Ok(written)
}
