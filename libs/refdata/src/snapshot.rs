//! Published read snapshots for cross-thread consumers
//!
//! The config agent is the single writer; after each applied update it
//! publishes an `Arc` copy of the entry here. Readers clone the `Arc`, so a
//! lookup is one short read lock and a refcount bump. Snapshots are
//! eventually consistent with the agent's caches; there are no cross-entry
//! transactions.

use crate::currency::CurrencyConfig;
use crate::tier::ClientTierConfig;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Shared read view of the client tier cache
#[derive(Clone, Default)]
pub struct TierSnapshots {
    inner: Arc<RwLock<HashMap<u16, Arc<ClientTierConfig>>>>,
}

impl TierSnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tier_id: u16) -> Option<Arc<ClientTierConfig>> {
        self.inner.read().get(&tier_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Replace the snapshot for `entry`'s tier (config agent is the writer)
    pub fn publish(&self, entry: &ClientTierConfig) {
        self.inner
            .write()
            .insert(entry.tier_id, Arc::new(entry.clone()));
    }
}

/// Shared read view of the currency cache
#[derive(Clone, Default)]
pub struct CurrencySnapshots {
    inner: Arc<RwLock<HashMap<u32, Arc<CurrencyConfig>>>>,
}

impl CurrencySnapshots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: u32) -> Option<Arc<CurrencyConfig>> {
        self.inner.read().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Replace the snapshot for `entry`'s currency (config agent is the writer)
    pub fn publish(&self, entry: &CurrencyConfig) {
        self.inner.write().insert(entry.id, Arc::new(entry.clone()));
    }
}
