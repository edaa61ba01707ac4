//! Periodic pause between admissions.
//!
//! Independent of the concurrency bound: after every `every` dequeued items
//! the admission loop sleeps for `pause` so providers do not rate-limit the run.

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Throttle {
    every: usize,
    pause: Duration,
    dequeued: usize,
}

impl Throttle {
    /// `every == 0` or a zero `pause` disables throttling.
    pub fn new(every: usize, pause: Duration) -> Self {
        Self {
            every,
            pause,
            dequeued: 0,
        }
    }

    /// Counts one dequeued item and returns the pause due before the next one.
    pub fn record_dequeue(&mut self) -> Option<Duration> {
        self.dequeued += 1;
        if self.every == 0 || self.pause.is_zero() {
            return None;
        }
        (self.dequeued % self.every == 0).then_some(self.pause)
    }

    pub fn dequeued(&self) -> usize {
        self.dequeued
    }
}
