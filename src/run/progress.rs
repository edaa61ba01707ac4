//! Run progress counters and snapshots.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use log::info;

/// Point-in-time view of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Items submitted to the run
    pub total: usize,
    /// Items that got an admission slot
    pub admitted: usize,
    /// Items currently holding a slot
    pub in_flight: usize,
    /// Highest `in_flight` value seen so far
    pub peak_in_flight: usize,
    /// Items whose record reached the aggregator
    pub completed: usize,
}

/// Shared counters behind `Progress`.
///
/// Updated by the admission loop and the item tasks, read by the progress
/// logger through `snapshot()`.
#[derive(Debug, Default)]
pub(crate) struct ProgressCounters {
    total: AtomicUsize,
    admitted: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    completed: AtomicUsize,
}

impl ProgressCounters {
    pub(crate) fn reset(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.admitted.store(0, Ordering::SeqCst);
        self.in_flight.store(0, Ordering::SeqCst);
        self.peak_in_flight.store(0, Ordering::SeqCst);
        self.completed.store(0, Ordering::SeqCst);
    }

    /// An item got a slot.
    pub(crate) fn admit(&self) {
        self.admitted.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    }

    /// An admitted item released its slot.
    pub(crate) fn release(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }

    /// A record (admitted or skipped) was handed to the aggregator.
    pub(crate) fn complete(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn snapshot(&self) -> Progress {
        Progress {
            total: self.total.load(Ordering::SeqCst),
            admitted: self.admitted.load(Ordering::SeqCst),
            in_flight: self.in_flight.load(Ordering::SeqCst),
            peak_in_flight: self.peak_in_flight.load(Ordering::SeqCst),
            completed: self.completed.load(Ordering::SeqCst),
        }
    }
}

/// Logs one progress line.
pub fn log_progress(start_time: Instant, progress: &Progress) {
    let elapsed_secs = start_time.elapsed().as_secs_f64();
    let rate = if elapsed_secs > 0.0 {
        progress.completed as f64 / elapsed_secs
    } else {
        0.0
    };
    info!(
        "Processed {}/{} items ({} in flight) in {:.2} seconds (~{:.2} items/sec)",
        progress.completed, progress.total, progress.in_flight, elapsed_secs, rate
    );
}
