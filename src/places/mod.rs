//! Places API lookup client.
//!
//! Given a domain, issues a text search (business-name query) against the
//! Places API (New), picks the best candidate (exact website match first),
//! runs the match heuristic, and returns a typed [`Listing`] or `None`.
//! HTTP and decode errors propagate to the caller; the caller decides
//! whether to record a null listing or retry.

pub mod types;

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

use crate::config::PLACES_API_BASE_URL;
use crate::domain::clean_business_name;
use crate::error_handling::InitializationError;
use crate::matching::{classify_match, MatchType};
use crate::models::Listing;
use types::{PlaceCandidate, SearchTextRequest, SearchTextResponse};

/// Fields requested from the search endpoint. Keeping the mask tight keeps
/// the billable SKU at the lower tier.
const SEARCH_FIELD_MASK: &str = "places.id,places.displayName,places.formattedAddress,places.websiteUri,places.rating,places.primaryTypeDisplayName";

/// How many candidates to request; more results give the reranking pass a
/// chance to find an exact website match below the top hit.
const MAX_RESULT_COUNT: u32 = 10;

const FALLBACK_PLACE_TYPE: &str = "Local Business";

/// Anything that can resolve a domain to a business listing.
///
/// The production implementation is [`PlacesClient`]; tests substitute a
/// call-counting double to verify cache behavior.
#[async_trait]
pub trait ListingProvider: Send + Sync {
    async fn search_listing(&self, domain: &str) -> Result<Option<Listing>>;
}

/// Owned Places API client: an HTTP client plus the API key.
pub struct PlacesClient {
    client: Arc<reqwest::Client>,
    api_key: String,
    base_url: String,
}

impl PlacesClient {
    /// Creates a client, rejecting an empty API key before any network call.
    pub fn new(client: Arc<reqwest::Client>, api_key: String) -> Result<Self, InitializationError> {
        if api_key.trim().is_empty() {
            return Err(InitializationError::MissingCredential(
                "Google Places API key (set GOOGLE_PLACES_API_KEY or --places-api-key)".into(),
            ));
        }
        Ok(PlacesClient {
            client,
            api_key,
            base_url: PLACES_API_BASE_URL.to_string(),
        })
    }

    /// Overrides the endpoint base URL. Used by tests to point at a local server.
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    async fn search_text(&self, query: &str) -> Result<SearchTextResponse> {
        let request = SearchTextRequest {
            text_query: query.to_string(),
            language_code: "en".to_string(),
            max_result_count: MAX_RESULT_COUNT,
        };

        let response = self
            .client
            .post(format!("{}/places:searchText", self.base_url))
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", SEARCH_FIELD_MASK)
            .json(&request)
            .send()
            .await
            .context("Places searchText request failed")?
            .error_for_status()
            .context("Places searchText returned an error status")?;

        response
            .json::<SearchTextResponse>()
            .await
            .context("Failed to decode Places searchText response")
    }
}

/// Picks the best candidate for the domain: the first exact website match
/// if any candidate has one, otherwise the first acceptable name match.
fn select_candidate<'a>(
    domain: &str,
    candidates: &'a [PlaceCandidate],
) -> Option<(&'a PlaceCandidate, MatchType)> {
    for candidate in candidates {
        if let Some(MatchType::Website) =
            classify_match(domain, candidate.name(), candidate.website_uri.as_deref())
        {
            return Some((candidate, MatchType::Website));
        }
    }

    for candidate in candidates {
        if let Some(match_type) =
            classify_match(domain, candidate.name(), candidate.website_uri.as_deref())
        {
            return Some((candidate, match_type));
        }
    }

    None
}

fn build_listing(candidate: &PlaceCandidate, match_type: MatchType) -> Listing {
    Listing {
        business_name: candidate.name().to_string(),
        address: candidate.formatted_address.clone().unwrap_or_default(),
        rating: candidate.rating.unwrap_or(0.0),
        place_type: candidate
            .primary_type_display_name
            .as_ref()
            .map(|t| t.text.clone())
            .unwrap_or_else(|| FALLBACK_PLACE_TYPE.to_string()),
        place_id: candidate.id.clone(),
        match_type,
        website_url: candidate.website_uri.clone(),
    }
}

#[async_trait]
impl ListingProvider for PlacesClient {
    async fn search_listing(&self, domain: &str) -> Result<Option<Listing>> {
        let query = clean_business_name(domain);
        if query.is_empty() {
            log::debug!("Domain {domain} reduced to an empty query, skipping search");
            return Ok(None);
        }
        log::debug!("Searching for business \"{query}\" (domain: {domain})");

        let response = self.search_text(&query).await?;
        if response.places.is_empty() {
            log::debug!("No places found for {domain}");
            return Ok(None);
        }

        match select_candidate(domain, &response.places) {
            Some((candidate, match_type)) => {
                log::debug!(
                    "Match for {domain}: \"{}\" ({})",
                    candidate.name(),
                    match_type.as_str()
                );
                Ok(Some(build_listing(candidate, match_type)))
            }
            None => {
                log::debug!("No candidate met the match criteria for {domain}");
                Ok(None)
            }
        }
    }
}
