//! Idle strategies for cooperative polling loops
//!
//! The scheduler calls [`IdleStrategy::idle`] after a cycle that produced no
//! work and [`IdleStrategy::reset`] after one that did. The backoff strategy
//! escalates spin -> yield -> park with a doubling park duration, so a quiet
//! stream costs near-zero CPU while a busy one stays on the fast path.

use std::thread;
use std::time::Duration;

/// Policy for burning time between unproductive scheduler cycles
pub trait IdleStrategy: Send {
    /// One idle step; repeated calls may escalate
    fn idle(&mut self);

    /// Return to the most responsive state
    fn reset(&mut self);

    /// Dispatch on a cycle's work count
    fn idle_for(&mut self, work_count: usize) {
        if work_count == 0 {
            self.idle();
        } else {
            self.reset();
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BackoffState {
    Spinning,
    Yielding,
    Parking,
}

/// Progressive backoff: spin, then yield, then park with doubling duration
pub struct BackoffIdleStrategy {
    max_spins: u64,
    max_yields: u64,
    min_park: Duration,
    max_park: Duration,
    state: BackoffState,
    count: u64,
    park: Duration,
}

impl BackoffIdleStrategy {
    pub fn new(max_spins: u64, max_yields: u64, min_park: Duration, max_park: Duration) -> Self {
        Self {
            max_spins,
            max_yields,
            min_park,
            max_park,
            state: BackoffState::Spinning,
            count: 0,
            park: min_park,
        }
    }

    /// True once the park duration has escalated to its ceiling
    pub fn at_max_backoff(&self) -> bool {
        self.state == BackoffState::Parking && self.park >= self.max_park
    }
}

impl Default for BackoffIdleStrategy {
    fn default() -> Self {
        Self::new(
            10,
            10,
            Duration::from_micros(1),
            Duration::from_millis(1),
        )
    }
}

impl IdleStrategy for BackoffIdleStrategy {
    fn idle(&mut self) {
        match self.state {
            BackoffState::Spinning => {
                std::hint::spin_loop();
                self.count += 1;
                if self.count >= self.max_spins {
                    self.state = BackoffState::Yielding;
                    self.count = 0;
                }
            }
            BackoffState::Yielding => {
                thread::yield_now();
                self.count += 1;
                if self.count >= self.max_yields {
                    self.state = BackoffState::Parking;
                    self.park = self.min_park;
                }
            }
            BackoffState::Parking => {
                thread::sleep(self.park);
                self.park = (self.park * 2).min(self.max_park);
            }
        }
    }

    fn reset(&mut self) {
        self.state = BackoffState::Spinning;
        self.count = 0;
        self.park = self.min_park;
    }
}

/// Never sleeps; for latency-critical loops that own a core
#[derive(Debug, Default)]
pub struct BusySpinIdleStrategy;

impl IdleStrategy for BusySpinIdleStrategy {
    fn idle(&mut self) {
        std::hint::spin_loop();
    }

    fn reset(&mut self) {}
}

/// Yields the time slice on every idle step
#[derive(Debug, Default)]
pub struct YieldingIdleStrategy;

impl IdleStrategy for YieldingIdleStrategy {
    fn idle(&mut self) {
        thread::yield_now();
    }

    fn reset(&mut self) {}
}
