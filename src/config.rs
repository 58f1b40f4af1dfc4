//! Command-line configuration and application constants.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default SQLite database path.
pub const DB_PATH: &str = "./listing_check.db";

/// How often the background progress logger reports, in seconds.
pub const LOGGING_INTERVAL_SECS: u64 = 5;

/// Hard timeout for processing a single domain (lookup + enrichment + write).
pub const DOMAIN_PROCESSING_TIMEOUT: Duration = Duration::from_secs(60);

/// Cached rows younger than this many days are served without provider calls.
pub const DEFAULT_FRESHNESS_DAYS: u32 = 7;

/// Minimum shorter/longer length ratio for a fuzzy name match.
pub const NAME_MATCH_MIN_RATIO: f64 = 0.7;

// Retry strategy for transient Places API failures
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 1000;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum number of attempts (initial try included)
pub const RETRY_MAX_ATTEMPTS: usize = 3;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 20;

pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

// Provider endpoints
pub const PLACES_API_BASE_URL: &str = "https://places.googleapis.com/v1";
pub const DATAFORSEO_API_BASE_URL: &str = "https://api.dataforseo.com/v3";
pub const AHREFS_API_BASE_URL: &str = "https://api.ahrefs.com/v3";

// Credential environment variables (read after dotenvy loads .env)
pub const ENV_PLACES_API_KEY: &str = "GOOGLE_PLACES_API_KEY";
pub const ENV_DATAFORSEO_LOGIN: &str = "DATAFORSEO_LOGIN";
pub const ENV_DATAFORSEO_PASSWORD: &str = "DATAFORSEO_PASSWORD";
pub const ENV_AHREFS_API_KEY: &str = "AHREFS_API_KEY";

/// Logging level for the application.
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    Plain,
    Json,
}

/// Command-line options.
///
/// # Examples
///
/// ```bash
/// # Check a list of domains
/// listing_check check domains.txt
///
/// # Re-check everything, ignoring cached rows
/// listing_check check domains.txt --freshness-days 0
///
/// # Export matched listings to CSV
/// listing_check export --output matches.csv --match-type website
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "listing_check",
    about = "Checks domains against the Google Places API for matching business listings."
)]
pub struct Cli {
    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info, global = true)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain, global = true)]
    pub log_format: LogFormat,

    /// Database path (SQLite file)
    #[arg(long, value_parser, default_value = DB_PATH, global = true)]
    pub db_path: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check a newline-delimited list of domains for business listings
    Check(CheckArgs),
    /// Export cached matches to CSV
    Export(ExportArgs),
    /// Delete cached check results
    ClearCache(ClearCacheArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// File with one domain per line ("-" reads from stdin)
    #[arg(value_parser)]
    pub file: PathBuf,

    /// Number of domains checked concurrently per batch
    #[arg(long, default_value_t = 10)]
    pub batch_size: usize,

    /// Requests per second against the Places API (0 disables limiting)
    #[arg(long, default_value_t = 5)]
    pub rate_limit_rps: u32,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_seconds: u64,

    /// Maximum age in days before a cached row is re-checked (0 forces re-check)
    #[arg(long, default_value_t = DEFAULT_FRESHNESS_DAYS)]
    pub freshness_days: u32,

    /// Also fetch SEO metrics (DataForSEO / Ahrefs) for each domain
    #[arg(long, default_value_t = false)]
    pub enrich: bool,

    /// Google Places API key (falls back to GOOGLE_PLACES_API_KEY)
    #[arg(long)]
    pub places_api_key: Option<String>,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Output file path (stdout if omitted)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Only export matches of this type
    #[arg(long, value_enum)]
    pub match_type: Option<MatchTypeFilter>,

    /// Only export rows checked at or after this epoch-millisecond timestamp
    #[arg(long)]
    pub since: Option<i64>,
}

#[derive(Debug, Args)]
pub struct ClearCacheArgs {
    /// Only clear the row for this domain (clears everything if omitted)
    #[arg(long)]
    pub domain: Option<String>,
}

/// Match-type filter for the export subcommand.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum MatchTypeFilter {
    Website,
    Name,
}
