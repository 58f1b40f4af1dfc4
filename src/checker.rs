//! Check-run orchestration.
//!
//! Reads a newline-delimited domain list, processes it in fixed-size
//! concurrent batches through the read-through cache, tracks progress and
//! error statistics, and produces a summary report. A failure on one
//! domain is recorded as a null-listing result and never aborts the run.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

use crate::app::{log_progress, print_error_statistics, shutdown_gracefully};
use crate::config::{
    CheckArgs, DOMAIN_PROCESSING_TIMEOUT, ENV_PLACES_API_KEY, LOGGING_INTERVAL_SECS,
};
use crate::enrichment::Enrichment;
use crate::error_handling::{ErrorType, InitializationError, ProcessingStats};
use crate::initialization::{init_client, init_rate_limiter, init_semaphore, RateLimiter};
use crate::matching::MatchType;
use crate::models::{DomainCheckResult, Listing};
use crate::places::{ListingProvider, PlacesClient};
use crate::storage::{check_domain, init_db_pool_with_path, run_migrations};
use crate::utils::{categorize_places_error, retry_with_backoff};

/// Summary of a completed check run.
#[derive(Debug, Clone)]
pub struct CheckReport {
    /// Domains read from the input list
    pub total_domains: usize,
    /// Domains with a matched listing
    pub found: usize,
    /// Listings matched by website
    pub website_matches: usize,
    /// Listings matched by name
    pub name_matches: usize,
    /// Domains checked with no acceptable listing
    pub not_found: usize,
    /// Domains whose lookup failed
    pub failed: usize,
    /// Results served from the cache without provider calls
    pub cache_hits: usize,
    /// Path to the SQLite database containing results
    pub db_path: PathBuf,
    /// Elapsed time in seconds
    pub elapsed_seconds: f64,
}

/// Wraps a provider with capped exponential backoff on retriable errors.
struct RetryingProvider<P> {
    inner: P,
}

#[async_trait]
impl<P: ListingProvider> ListingProvider for RetryingProvider<P> {
    async fn search_listing(&self, domain: &str) -> Result<Option<Listing>> {
        retry_with_backoff(|| self.inner.search_listing(domain)).await
    }
}

/// Parses newline-delimited domain input into trimmed entries, skipping
/// blank lines and `#` comments.
pub fn parse_domain_list(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}

async fn read_domains(file: &Path) -> Result<Vec<String>> {
    let mut domains = Vec::new();

    if file.as_os_str() == "-" {
        log::info!("Reading domains from stdin");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim();
            if !trimmed.is_empty() && !trimmed.starts_with('#') {
                domains.push(trimmed.to_string());
            }
        }
    } else {
        let content = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to open input file: {}", file.display()))?;
        domains = parse_domain_list(&content);
    }

    Ok(domains)
}

fn resolve_api_key(args: &CheckArgs) -> Result<String, InitializationError> {
    args.places_api_key
        .clone()
        .or_else(|| std::env::var(ENV_PLACES_API_KEY).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            InitializationError::MissingCredential(
                "Google Places API key (set GOOGLE_PLACES_API_KEY or --places-api-key)".into(),
            )
        })
}

/// Runs a check over the domain list in `args.file`.
///
/// This is the main library entry point for the `check` subcommand.
/// Credentials are validated before any network call; per-domain failures
/// are logged, counted, and recorded as null-listing results.
pub async fn run_check(db_path: &Path, args: &CheckArgs) -> Result<CheckReport> {
    let api_key = resolve_api_key(args)?;

    let client = init_client(args.timeout_seconds).context("Failed to initialize HTTP client")?;
    let places = PlacesClient::new(Arc::clone(&client), api_key)?;
    let provider: Arc<dyn ListingProvider> = Arc::new(RetryingProvider { inner: places });

    let enrichment = if args.enrich {
        let enrichment = Enrichment::from_env(Arc::clone(&client));
        if !enrichment.is_enabled() {
            log::warn!("--enrich set but no enrichment credentials found, continuing without");
        }
        Some(Arc::new(enrichment))
    } else {
        None
    };

    let pool = init_db_pool_with_path(db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let domains = read_domains(&args.file).await?;
    let total = domains.len();
    log::info!("Total domains in list: {total}");
    if total == 0 {
        return Ok(CheckReport {
            total_domains: 0,
            found: 0,
            website_matches: 0,
            name_matches: 0,
            not_found: 0,
            failed: 0,
            cache_hits: 0,
            db_path: db_path.to_path_buf(),
            elapsed_seconds: 0.0,
        });
    }

    let batch_size = args.batch_size.max(1);
    let semaphore = init_semaphore(batch_size);
    let rate_burst = if args.rate_limit_rps > 0 {
        std::cmp::min(batch_size, args.rate_limit_rps.saturating_mul(2) as usize)
    } else {
        batch_size
    };
    let (rate_limiter, rate_limiter_shutdown) =
        match init_rate_limiter(args.rate_limit_rps, rate_burst) {
            Some((limiter, shutdown)) => (Some(limiter), Some(shutdown)),
            None => (None, None),
        };

    let freshness = Duration::from_secs(u64::from(args.freshness_days) * 24 * 3600);
    let stats = Arc::new(ProcessingStats::new());
    let completed = Arc::new(AtomicUsize::new(0));
    let failed = Arc::new(AtomicUsize::new(0));
    let start_time = std::time::Instant::now();

    let cancel = CancellationToken::new();
    let cancel_logging = cancel.child_token();
    let completed_for_logging = Arc::clone(&completed);
    let failed_for_logging = Arc::clone(&failed);
    let logging_task = tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(LOGGING_INTERVAL_SECS));
        // The first tick fires immediately; skip it
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    log_progress(start_time, &completed_for_logging, &failed_for_logging, total);
                }
                _ = cancel_logging.cancelled() => {
                    break;
                }
            }
        }
    });

    let mut results: Vec<DomainCheckResult> = Vec::with_capacity(total);

    // Fixed-size batches: each batch is joined before the next one starts
    for batch in domains.chunks(batch_size) {
        let mut tasks = Vec::with_capacity(batch.len());

        for domain in batch {
            let domain = domain.clone();
            let provider = Arc::clone(&provider);
            let enrichment = enrichment.clone();
            let pool = Arc::clone(&pool);
            let stats = Arc::clone(&stats);
            let semaphore = Arc::clone(&semaphore);
            let rate_limiter: Option<Arc<RateLimiter>> = rate_limiter.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                if let Some(limiter) = &rate_limiter {
                    limiter.acquire().await;
                }

                let outcome = tokio::time::timeout(
                    DOMAIN_PROCESSING_TIMEOUT,
                    check_domain(
                        &pool,
                        provider.as_ref(),
                        enrichment.as_deref(),
                        &stats,
                        &domain,
                        freshness,
                    ),
                )
                .await;

                match outcome {
                    Ok(Ok(result)) => Ok(result),
                    Ok(Err(e)) => {
                        log::warn!("Error checking domain {domain}: {e:#}");
                        stats.increment_error(categorize_places_error(&e));
                        Err(domain)
                    }
                    Err(_) => {
                        log::warn!(
                            "Timeout checking domain {domain} after {}s",
                            DOMAIN_PROCESSING_TIMEOUT.as_secs()
                        );
                        stats.increment_error(ErrorType::DomainProcessingTimeout);
                        Err(domain)
                    }
                }
            }));
        }

        for joined in futures::future::join_all(tasks).await {
            match joined {
                Ok(Ok(result)) => {
                    completed.fetch_add(1, Ordering::SeqCst);
                    results.push(result);
                }
                Ok(Err(domain)) => {
                    // Lookup failed: record a null-listing result and move on
                    failed.fetch_add(1, Ordering::SeqCst);
                    results.push(DomainCheckResult::not_found(
                        &domain,
                        chrono::Utc::now().timestamp_millis(),
                    ));
                }
                Err(join_error) => {
                    failed.fetch_add(1, Ordering::SeqCst);
                    log::warn!("Check task panicked: {join_error:?}");
                }
            }
        }
    }

    shutdown_gracefully(cancel, Some(logging_task), rate_limiter_shutdown).await;
    log_progress(start_time, &completed, &failed, total);
    print_error_statistics(&stats);

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    Ok(build_report(
        results,
        total,
        failed.load(Ordering::SeqCst),
        db_path.to_path_buf(),
        elapsed_seconds,
    ))
}

fn build_report(
    results: Vec<DomainCheckResult>,
    total: usize,
    failed: usize,
    db_path: PathBuf,
    elapsed_seconds: f64,
) -> CheckReport {
    let mut found = 0;
    let mut website_matches = 0;
    let mut name_matches = 0;
    let mut cache_hits = 0;

    for result in &results {
        if result.from_cache {
            cache_hits += 1;
        }
        if let Some(listing) = &result.listing {
            found += 1;
            match listing.match_type {
                MatchType::Website => website_matches += 1,
                MatchType::Name => name_matches += 1,
            }
        }
    }

    CheckReport {
        total_domains: total,
        found,
        website_matches,
        name_matches,
        not_found: total.saturating_sub(found + failed),
        failed,
        cache_hits,
        db_path,
        elapsed_seconds,
    }
}
