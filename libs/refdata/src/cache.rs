//! Pool-backed configuration caches
//!
//! One live entry instance per key: first sight of a key takes an instance
//! from the pool, every later sighting mutates that same instance in place.
//! Entries are reclaimed only by process restart. Both caches are keyed by
//! the update's own id field.

use crate::currency::CurrencyConfig;
use crate::error::ValidationError;
use crate::tier::{self, ClientTierConfig};
use runtime::{ObjectPool, PoolError};
use std::collections::HashMap;
use types::{ClientTierConfigMsg, ClientTierLevel, CurrencyConfigMsg};
use tracing::debug;

const CURRENCY_POOL_CAPACITY: usize = 16;
const TIER_POOL_CAPACITY: usize = 8;
const POOL_GROWTH: f64 = 2.0;

/// Currency metadata cache keyed by currency id
pub struct CurrencyCache {
    pool: ObjectPool<CurrencyConfig>,
    entries: HashMap<u32, CurrencyConfig>,
}

impl CurrencyCache {
    pub fn new() -> Result<Self, PoolError> {
        Ok(Self {
            pool: ObjectPool::new(CURRENCY_POOL_CAPACITY, POOL_GROWTH, CurrencyConfig::default)?,
            entries: HashMap::new(),
        })
    }

    pub fn get(&self, id: u32) -> Option<&CurrencyConfig> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply one decoded update; returns the updated entry on success
    pub fn apply_update(
        &mut self,
        msg: &CurrencyConfigMsg,
    ) -> Result<&CurrencyConfig, ValidationError> {
        if let Some(existing) = self.entries.get_mut(&msg.id) {
            existing.apply(msg)?;
        } else {
            let mut entry = self.pool.acquire();
            if let Err(err) = entry.apply(msg) {
                self.pool.release(entry);
                return Err(err);
            }
            debug!(id = msg.id, symbol = msg.symbol_str(), "new currency cached");
            self.entries.insert(msg.id, entry);
        }
        Ok(&self.entries[&msg.id])
    }

    #[cfg(test)]
    pub(crate) fn pooled_free(&self) -> usize {
        self.pool.free_count()
    }
}

/// Client tier parameter cache keyed by tier id
pub struct ClientTierCache {
    pool: ObjectPool<ClientTierConfig>,
    entries: HashMap<u16, ClientTierConfig>,
}

impl ClientTierCache {
    pub fn new() -> Result<Self, PoolError> {
        Ok(Self {
            pool: ObjectPool::new(TIER_POOL_CAPACITY, POOL_GROWTH, ClientTierConfig::default)?,
            entries: HashMap::new(),
        })
    }

    /// Cache pre-seeded with the well-known tier defaults; replayed real
    /// configuration silently overwrites them
    pub fn with_bootstrap_defaults() -> Result<Self, PoolError> {
        let mut cache = Self::new()?;
        for level in ClientTierLevel::ALL {
            let msg = tier::bootstrap_msg(level);
            // bootstrap defaults are statically valid
            if cache.apply_update(&msg).is_err() {
                debug!(tier_id = level.id(), "bootstrap default rejected");
            }
        }
        Ok(cache)
    }

    pub fn get(&self, tier_id: u16) -> Option<&ClientTierConfig> {
        self.entries.get(&tier_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply one decoded update; returns the updated entry on success
    pub fn apply_update(
        &mut self,
        msg: &ClientTierConfigMsg,
    ) -> Result<&ClientTierConfig, ValidationError> {
        if let Some(existing) = self.entries.get_mut(&msg.tier_id) {
            existing.apply(msg)?;
        } else {
            let mut entry = self.pool.acquire();
            if let Err(err) = entry.apply(msg) {
                self.pool.release(entry);
                return Err(err);
            }
            debug!(
                tier_id = msg.tier_id,
                tier_name = msg.tier_name_str(),
                "new client tier cached"
            );
            self.entries.insert(msg.tier_id, entry);
        }
        Ok(&self.entries[&msg.tier_id])
    }

    #[cfg(test)]
    pub(crate) fn pooled_free(&self) -> usize {
        self.pool.free_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zerocopy::FromZeroes;

    fn currency_msg(id: u32, symbol: &str) -> CurrencyConfigMsg {
        let mut msg = CurrencyConfigMsg::new_zeroed();
        msg.id = id;
        msg.spot_precision = 2;
        msg.forward_precision = 4;
        msg.symbol[..symbol.len()].copy_from_slice(symbol.as_bytes());
        msg.symbol_len = symbol.len() as u8;
        msg
    }

    #[test]
    fn first_sight_takes_from_pool_resighting_does_not() {
        let mut cache = CurrencyCache::new().unwrap();
        let free_before = cache.pooled_free();

        cache.apply_update(&currency_msg(1, "USD")).unwrap();
        assert_eq!(cache.pooled_free(), free_before - 1);

        let mut update = currency_msg(1, "USD");
        update.spot_precision = 3;
        cache.apply_update(&update).unwrap();
        assert_eq!(cache.pooled_free(), free_before - 1);
        assert_eq!(cache.get(1).unwrap().spot_precision, 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn rejected_first_sight_returns_instance_to_pool() {
        let mut cache = CurrencyCache::new().unwrap();
        let free_before = cache.pooled_free();

        let mut bad = currency_msg(9, "CHF");
        bad.symbol_len = 0;
        assert!(cache.apply_update(&bad).is_err());
        assert_eq!(cache.pooled_free(), free_before);
        assert!(cache.get(9).is_none());
    }

    #[test]
    fn rejected_update_preserves_cached_value() {
        let mut cache = ClientTierCache::new().unwrap();
        let gold = tier::bootstrap_msg(ClientTierLevel::Gold);
        cache.apply_update(&gold).unwrap();

        let mut bad = gold;
        bad.max_notional = gold.min_notional - 1.0;
        assert!(cache.apply_update(&bad).is_err());
        assert_eq!(cache.get(3).unwrap().max_notional, 50_000_000.0);
    }

    #[test]
    fn bootstrap_defaults_cover_all_tiers() {
        let cache = ClientTierCache::with_bootstrap_defaults().unwrap();
        assert_eq!(cache.len(), 4);
        for level in ClientTierLevel::ALL {
            let entry = cache.get(level.id()).unwrap();
            assert_eq!(entry.tier_name, level.name());
            assert_eq!(entry.tier_id, level.id());
        }
    }

    #[test]
    fn replayed_config_overwrites_bootstrap_defaults() {
        let mut cache = ClientTierCache::with_bootstrap_defaults().unwrap();
        let free_after_seed = cache.pooled_free();

        let mut update = tier::bootstrap_msg(ClientTierLevel::Gold);
        update.markup_bps = 9.0;
        cache.apply_update(&update).unwrap();
        assert_eq!(cache.get(3).unwrap().markup_bps, 9.0);
        // in-place overwrite, no new pooled instance
        assert_eq!(cache.pooled_free(), free_after_seed);
    }
}
