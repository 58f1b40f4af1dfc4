//! Domain/business-name match heuristic.
//!
//! Decides whether a Places API candidate corresponds to an input domain.
//! A website match (normalized host equality) always takes precedence; a
//! fuzzy name match is only evaluated when there is no website match. When
//! neither holds, no listing is attached to the domain at all.

use serde::{Deserialize, Serialize};

use crate::config::NAME_MATCH_MIN_RATIO;
use crate::domain::{clean_business_name, normalize_domain};

/// Why a listing was associated with a domain.
///
/// A listing always carries a match type; "no match" is represented by the
/// absence of a listing, never by a listing without a match type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The candidate's website resolves to the same normalized host.
    Website,
    /// The candidate's business name fuzzily matches the domain token.
    Name,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::Website => "website",
            MatchType::Name => "name",
        }
    }
}

/// Returns true when two domains or URLs refer to the same host after
/// normalization, tolerating a `www.` prefix difference.
pub fn domains_match(domain1: &str, domain2: &str) -> bool {
    if domain1.is_empty() || domain2.is_empty() {
        return false;
    }

    let norm1 = normalize_domain(domain1);
    let norm2 = normalize_domain(domain2);
    if norm1.is_empty() || norm2.is_empty() {
        return false;
    }

    norm1 == norm2 || format!("www.{norm1}") == norm2 || norm1 == format!("www.{norm2}")
}

/// Fuzzy comparison of a candidate business name against the cleaned
/// business-name token derived from the domain.
///
/// Matches when one contains the other and the shorter/longer length ratio
/// exceeds the threshold, so "Acme" does not match "Acme Plumbing and
/// Heating Supplies of Greater Manchester".
fn names_match(candidate_name: &str, cleaned_token: &str) -> bool {
    let candidate = candidate_name.to_lowercase();
    let token = cleaned_token.to_lowercase();
    if candidate.is_empty() || token.is_empty() {
        return false;
    }

    let contains = candidate.contains(&token) || token.contains(&candidate);
    if !contains {
        return false;
    }

    let shorter = candidate.len().min(token.len()) as f64;
    let longer = candidate.len().max(token.len()) as f64;
    shorter / longer > NAME_MATCH_MIN_RATIO
}

/// Classifies a Places candidate against the input domain.
///
/// Returns `Some(MatchType::Website)` when the candidate's website URL
/// normalizes to the input domain, `Some(MatchType::Name)` when only the
/// fuzzy name comparison holds, and `None` when the candidate should not
/// be associated with the domain.
pub fn classify_match(
    domain: &str,
    candidate_name: &str,
    candidate_website: Option<&str>,
) -> Option<MatchType> {
    if let Some(website) = candidate_website {
        if domains_match(domain, website) {
            return Some(MatchType::Website);
        }
    }

    if names_match(candidate_name, &clean_business_name(domain)) {
        return Some(MatchType::Name);
    }

    None
}
