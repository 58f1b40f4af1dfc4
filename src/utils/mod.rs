//! Shared utilities.

pub mod retry;

pub use retry::{categorize_places_error, is_retriable_error, retry_with_backoff};
