//! Application-level helpers: progress logging, end-of-run statistics,
//! and graceful shutdown of background tasks.

pub mod logging;
pub mod shutdown;
pub mod statistics;

pub use logging::log_progress;
pub use shutdown::shutdown_gracefully;
pub use statistics::print_error_statistics;
