//! # Fxgrid RefData - Configuration Reference Data
//!
//! ## Purpose
//!
//! The slowly-changing side of the system: currency metadata and client tier
//! commercial parameters, propagated as config frames over a durable log.
//! This crate owns the cache entities and their validation rules, the
//! pool-backed caches that reuse one entry instance per key, the published
//! read snapshots the pricing thread consumes, and the [`ConfigAgent`]
//! worker that replays the log on startup and then applies live updates.
//!
//! ## Ownership Model
//!
//! The agent thread is the single writer: caches and their pools belong to
//! it exclusively. After each applied update it publishes an `Arc` copy of
//! the entry into the shared snapshot map; readers on other threads get
//! eventually-consistent copies and never contend with the writer beyond a
//! short lock.

pub mod agent;
pub mod cache;
pub mod currency;
pub mod error;
pub mod snapshot;
pub mod tier;

pub use agent::{BootstrapState, ConfigAgent, ConfigStore};
pub use cache::{ClientTierCache, CurrencyCache};
pub use currency::CurrencyConfig;
pub use error::ValidationError;
pub use snapshot::{CurrencySnapshots, TierSnapshots};
pub use tier::ClientTierConfig;
