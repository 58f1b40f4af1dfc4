//! Optional SEO/domain-metrics enrichment.
//!
//! Providers are configured from environment credentials; a missing
//! credential simply disables that provider. Enrichment failures are
//! logged and counted but never fail the domain check.

pub mod ahrefs;
pub mod dataforseo;

use chrono::Utc;
use std::sync::Arc;

use crate::config::{ENV_AHREFS_API_KEY, ENV_DATAFORSEO_LOGIN, ENV_DATAFORSEO_PASSWORD};
use crate::error_handling::{ErrorType, ProcessingStats};
use crate::models::DomainMetrics;
use ahrefs::AhrefsClient;
use dataforseo::DataForSeoClient;

/// The metrics providers available for this run.
pub struct Enrichment {
    dataforseo: Option<DataForSeoClient>,
    ahrefs: Option<AhrefsClient>,
}

/// What enrichment produced for one domain.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentResult {
    pub metrics: Option<DomainMetrics>,
    pub domain_age_years: Option<f64>,
}

impl Enrichment {
    /// Builds providers from environment credentials; providers with
    /// missing credentials are disabled.
    pub fn from_env(client: Arc<reqwest::Client>) -> Self {
        let dataforseo = match (
            std::env::var(ENV_DATAFORSEO_LOGIN),
            std::env::var(ENV_DATAFORSEO_PASSWORD),
        ) {
            (Ok(login), Ok(password)) if !login.is_empty() && !password.is_empty() => {
                Some(DataForSeoClient::new(Arc::clone(&client), login, password))
            }
            _ => {
                log::info!("DataForSEO credentials not set, whois enrichment disabled");
                None
            }
        };

        let ahrefs = match std::env::var(ENV_AHREFS_API_KEY) {
            Ok(key) if !key.is_empty() => Some(AhrefsClient::new(client, key)),
            _ => {
                log::info!("Ahrefs API key not set, domain-rating enrichment disabled");
                None
            }
        };

        Enrichment { dataforseo, ahrefs }
    }

    pub fn with_providers(
        dataforseo: Option<DataForSeoClient>,
        ahrefs: Option<AhrefsClient>,
    ) -> Self {
        Enrichment { dataforseo, ahrefs }
    }

    /// True when at least one provider is configured.
    pub fn is_enabled(&self) -> bool {
        self.dataforseo.is_some() || self.ahrefs.is_some()
    }

    /// Fetches metrics for a domain from every configured provider.
    ///
    /// Never fails: provider errors are logged, counted in `stats`, and
    /// degrade to absent fields.
    pub async fn enrich(&self, domain: &str, stats: &ProcessingStats) -> EnrichmentResult {
        let mut result = EnrichmentResult::default();

        if let Some(dataforseo) = &self.dataforseo {
            match dataforseo.fetch_whois_overview(domain).await {
                Ok(Some(overview)) => {
                    result.domain_age_years = overview.age_years(Utc::now());
                    result.metrics = Some(overview.metrics);
                }
                Ok(None) => {
                    log::debug!("DataForSEO returned no whois data for {domain}");
                }
                Err(e) => {
                    log::warn!("DataForSEO enrichment failed for {domain}: {e:#}");
                    stats.increment_error(ErrorType::DataForSeoError);
                }
            }
        }

        if let Some(ahrefs) = &self.ahrefs {
            match ahrefs.fetch_domain_rating(domain).await {
                Ok(Some(rating)) => {
                    // Ahrefs is the authority on domain rating when both
                    // providers return one
                    result
                        .metrics
                        .get_or_insert_with(DomainMetrics::default)
                        .domain_rating = Some(rating);
                }
                Ok(None) => {
                    log::debug!("Ahrefs returned no domain rating for {domain}");
                }
                Err(e) => {
                    log::warn!("Ahrefs enrichment failed for {domain}: {e:#}");
                    stats.increment_error(ErrorType::AhrefsError);
                }
            }
        }

        if let Some(metrics) = &result.metrics {
            if metrics.is_empty() {
                result.metrics = None;
            }
        }

        result
    }
}
