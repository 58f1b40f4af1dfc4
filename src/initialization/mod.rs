//! Initialization helpers for logging, HTTP clients, concurrency limits,
//! and the request rate limiter.

pub mod client;
pub mod logger;
pub mod rate_limiter;

use std::sync::Arc;
use tokio::sync::Semaphore;

pub use client::init_client;
pub use logger::init_logger_with;
pub use rate_limiter::{init_rate_limiter, RateLimiter};

/// Creates the semaphore bounding concurrent domain checks.
pub fn init_semaphore(limit: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(limit.max(1)))
}
