//! End-of-run statistics.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, ProcessingStats};

/// Prints the non-zero degraded-outcome counters to the log.
pub fn print_error_statistics(stats: &ProcessingStats) {
    let total = stats.total_errors();
    if total == 0 {
        info!("No lookup errors recorded");
        return;
    }

    info!("Error Counts ({} total):", total);
    for error_type in ErrorType::iter() {
        let count = stats.get_error_count(error_type);
        if count > 0 {
            info!("   {}: {}", error_type.as_str(), count);
        }
    }
}
