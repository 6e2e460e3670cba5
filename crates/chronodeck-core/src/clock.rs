//! Monotonic time sources.
//!
//! Every duration in the engine is a difference of `now_ms()` readings.
//! Wall-clock time never participates in elapsed-time math; it only appears
//! as the `at` stamp on emitted [`Event`](crate::events::Event)s.

use std::cell::Cell;
use std::time::Instant;

/// Monotonic millisecond time source.
///
/// Implementations must be nondecreasing and immune to wall-clock
/// adjustments.
pub trait ClockSource {
    fn now_ms(&self) -> u64;
}

/// Production clock backed by [`std::time::Instant`], anchored at creation.
#[derive(Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockSource for MonotonicClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Manually advanced clock for tests and simulations.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    /// Move the clock forward. The clock never moves backwards.
    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }
}

impl ClockSource for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_is_nondecreasing() {
        let clock = MonotonicClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(100);
        assert_eq!(clock.now_ms(), 100);
        clock.advance(50);
        assert_eq!(clock.now_ms(), 150);
    }
}
