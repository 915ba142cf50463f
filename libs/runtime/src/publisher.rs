//! Bounded-retry publishing over a backpressured channel

use crate::idle::IdleStrategy;
use transport::{Publication, TransportError};
use tracing::warn;

/// Retry attempts allowed per frame before backpressure is surfaced
pub const DEFAULT_RETRY_BUDGET: usize = 1000;

/// Wraps a publication with a bounded retry loop
///
/// Transient backpressure is retried under the idle strategy up to the
/// budget, then surfaced to the caller. Terminal results (closed channel,
/// oversized frame) are returned immediately and never retried.
pub struct RetryingPublisher {
    publication: Box<dyn Publication>,
    idle: Box<dyn IdleStrategy>,
    retry_budget: usize,
}

impl RetryingPublisher {
    pub fn new(publication: Box<dyn Publication>, idle: Box<dyn IdleStrategy>) -> Self {
        Self::with_budget(publication, idle, DEFAULT_RETRY_BUDGET)
    }

    pub fn with_budget(
        publication: Box<dyn Publication>,
        idle: Box<dyn IdleStrategy>,
        retry_budget: usize,
    ) -> Self {
        Self {
            publication,
            idle,
            retry_budget,
        }
    }

    pub fn stream_id(&self) -> i32 {
        self.publication.stream_id()
    }

    /// Offer `frame`, retrying transient backpressure within the budget
    pub fn publish(&mut self, frame: &[u8]) -> Result<u64, TransportError> {
        let mut attempts = 0;
        loop {
            match self.publication.offer(frame) {
                Ok(position) => {
                    self.idle.reset();
                    return Ok(position);
                }
                Err(err) if err.is_transient() => {
                    attempts += 1;
                    if attempts > self.retry_budget {
                        warn!(
                            stream_id = self.publication.stream_id(),
                            attempts, "retry budget exhausted, dropping frame"
                        );
                        return Err(err);
                    }
                    self.idle.idle();
                }
                Err(err) => {
                    warn!(
                        stream_id = self.publication.stream_id(),
                        error = %err,
                        "terminal offer failure"
                    );
                    return Err(err);
                }
            }
        }
    }
}
