//! Core data types shared across modules.

use serde::{Deserialize, Serialize};

use crate::matching::MatchType;

/// A business record returned by the Places API for a given domain.
///
/// Immutable once produced by the lookup client. A `Listing` only exists
/// when the match heuristic accepted the candidate, so `match_type` is
/// always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub business_name: String,
    pub address: String,
    pub rating: f64,
    /// Human-readable primary type (e.g. "Plumber"), "Local Business" when
    /// the API omits it.
    pub place_type: String,
    pub place_id: String,
    pub match_type: MatchType,
    pub website_url: Option<String>,
}

/// Auxiliary SEO/domain metrics from third-party providers.
///
/// Every field is nullable: enrichment failures degrade to "no data"
/// rather than failing the check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainMetrics {
    pub domain_rating: Option<f64>,
    pub semrush_rank: Option<i64>,
    pub facebook_shares: Option<i64>,
    pub ahrefs_rank: Option<i64>,
}

impl DomainMetrics {
    /// True when no provider returned any value.
    pub fn is_empty(&self) -> bool {
        self.domain_rating.is_none()
            && self.semrush_rank.is_none()
            && self.facebook_shares.is_none()
            && self.ahrefs_rank.is_none()
    }
}

/// The outcome of checking one domain.
#[derive(Debug, Clone)]
pub struct DomainCheckResult {
    pub domain: String,
    /// `None` means no acceptable listing was found (or the lookup failed).
    pub listing: Option<Listing>,
    pub metrics: Option<DomainMetrics>,
    /// Domain age in years, derived from the WHOIS creation date.
    pub domain_age_years: Option<f64>,
    /// Epoch milliseconds of when this result was produced or cached.
    pub checked_at: i64,
    /// True when served from the cache without provider calls.
    pub from_cache: bool,
}

impl DomainCheckResult {
    /// A result recording that the check ran but found (or could fetch) nothing.
    pub fn not_found(domain: &str, checked_at: i64) -> Self {
        DomainCheckResult {
            domain: domain.to_string(),
            listing: None,
            metrics: None,
            domain_age_years: None,
            checked_at,
            from_cache: false,
        }
    }
}
