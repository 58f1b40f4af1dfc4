// error_handling/mod.rs
// Error types and processing statistics

pub mod stats;
pub mod types;

pub use stats::ProcessingStats;
pub use types::{DatabaseError, ErrorType, InitializationError};
