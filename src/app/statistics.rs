//! End-of-run error statistics reporting.

use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats};

/// Prints non-zero error counters at the end of a run.
pub fn print_error_statistics(stats: &ProcessingStats) {
    let total = stats.total_errors();
    if total == 0 {
        log::info!("No errors encountered");
        return;
    }

    log::info!("Error statistics ({total} total):");
    for error_type in ErrorType::iter() {
        let count = stats.get_error_count(error_type);
        if count > 0 {
            log::info!("  {}: {}", error_type.as_str(), count);
        }
    }
}
