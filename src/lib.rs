//! listing_check: checks domains against the Google Places API for
//! matching business listings, with optional SEO enrichment and a
//! SQLite-backed result cache.
//!
//! The library surface exists mainly for the binary and for integration
//! tests; `run_check` is the primary entry point.

pub mod app;
pub mod checker;
pub mod config;
pub mod domain;
pub mod enrichment;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod matching;
pub mod models;
pub mod places;
pub mod storage;
pub mod utils;

pub use checker::{run_check, CheckReport};
pub use config::{Cli, Command};
pub use export::{export_matches, ExportFilter};
pub use matching::MatchType;
pub use models::{DomainCheckResult, DomainMetrics, Listing};
pub use storage::{clear_cache, init_db_pool_with_path, run_migrations};
