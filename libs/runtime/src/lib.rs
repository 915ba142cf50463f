//! # Fxgrid Runtime - Cooperative Worker Harness
//!
//! ## Purpose
//!
//! Everything a process role needs to run its non-blocking workers on one
//! dedicated thread: the [`Worker`] trait, a composite poller that
//! round-robins a fixed worker set, a progressive backoff [`IdleStrategy`]
//! driven by per-cycle work counts, and the [`AgentRunner`] that owns the
//! thread and the shutdown handshake.
//!
//! Also home to the hot-path support pieces that belong to a single worker
//! thread: the growable [`ObjectPool`] backing reusable cache entries, the
//! [`HeartbeatAgent`], and the bounded-retry [`RetryingPublisher`] used
//! wherever an offer can be backpressured.
//!
//! ## Threading Model
//!
//! One `AgentRunner` per process role. Workers are single-threaded by
//! contract: pools and caches are owned by the worker that uses them and are
//! never shared across threads. The only cross-thread values are the bus
//! handles and the published refdata snapshots.

pub mod heartbeat;
pub mod idle;
pub mod pool;
pub mod publisher;
pub mod runner;
pub mod worker;

pub use heartbeat::HeartbeatAgent;
pub use idle::{BackoffIdleStrategy, BusySpinIdleStrategy, IdleStrategy, YieldingIdleStrategy};
pub use pool::{ObjectPool, PoolError};
pub use publisher::{RetryingPublisher, DEFAULT_RETRY_BUDGET};
pub use runner::AgentRunner;
pub use worker::{MultiStreamPoller, Worker};

use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock nanoseconds since the Unix epoch
pub fn epoch_nanos() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

/// Wall-clock milliseconds since the Unix epoch
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
