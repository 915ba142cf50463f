//! Growable object pool for reusable hot-path entities
//!
//! A stack of pre-built instances with dual-direction growth: exhaustion in
//! `acquire` grows the hand-out side on the right with freshly built
//! instances, over-release grows the return side on the left by shifting the
//! stored free instances into the upper half. Live checked-out instances are
//! never copied by either growth path.
//!
//! A pool belongs to exactly one worker thread. Sharing one across threads
//! is out of contract.

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum PoolError {
    /// Growth factor must strictly exceed 1 or the pool can never grow
    #[error("growth factor must be > 1.0, got {got}")]
    InvalidGrowthFactor { got: f64 },
}

/// Free-list stack of reusable instances
///
/// Slots `[pointer, capacity)` hold the pooled free instances; `acquire`
/// hands out from `pointer` upward and `release` pushes back down.
pub struct ObjectPool<T> {
    slots: Vec<Option<T>>,
    pointer: usize,
    factory: Box<dyn FnMut() -> T + Send>,
    growth_factor: f64,
}

impl<T> core::fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("capacity", &self.slots.len())
            .field("pointer", &self.pointer)
            .field("growth_factor", &self.growth_factor)
            .finish_non_exhaustive()
    }
}

impl<T> ObjectPool<T> {
    pub fn new(
        initial_capacity: usize,
        growth_factor: f64,
        mut factory: impl FnMut() -> T + Send + 'static,
    ) -> Result<Self, PoolError> {
        if growth_factor <= 1.0 {
            return Err(PoolError::InvalidGrowthFactor { got: growth_factor });
        }
        let slots = (0..initial_capacity).map(|_| Some(factory())).collect();
        Ok(Self {
            slots,
            pointer: 0,
            factory: Box::new(factory),
            growth_factor,
        })
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Instances currently held by the pool
    pub fn free_count(&self) -> usize {
        self.slots.len() - self.pointer
    }

    fn grown_capacity(&self) -> usize {
        let target = (self.slots.len() as f64 * self.growth_factor).ceil() as usize;
        target.max(self.slots.len() + 1)
    }

    /// Take an instance out of the pool, growing rightward when exhausted
    pub fn acquire(&mut self) -> T {
        if self.pointer == self.slots.len() {
            let new_capacity = self.grown_capacity();
            debug!(
                from = self.slots.len(),
                to = new_capacity,
                "pool exhausted, growing hand-out side"
            );
            while self.slots.len() < new_capacity {
                self.slots.push(Some((self.factory)()));
            }
        }
        let instance = self.slots[self.pointer]
            .take()
            .unwrap_or_else(|| (self.factory)());
        self.pointer += 1;
        instance
    }

    /// Return an instance to the pool, growing leftward when full
    pub fn release(&mut self, instance: T) {
        if self.pointer == 0 {
            let new_capacity = self.grown_capacity();
            let shift = new_capacity - self.slots.len();
            debug!(
                from = self.slots.len(),
                to = new_capacity,
                "pool over-released, growing return side"
            );
            let mut grown: Vec<Option<T>> = (0..shift).map(|_| None).collect();
            grown.append(&mut self.slots);
            self.slots = grown;
            self.pointer = shift;
        }
        self.pointer -= 1;
        self.slots[self.pointer] = Some(instance);
    }
}
