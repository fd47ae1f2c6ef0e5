//! Recycle pool for hazard records
//!
//! Hazards are created and destroyed at a high rate (several waves per second),
//! so destroyed records go back into a bounded LIFO stack and are reconfigured
//! on the next spawn instead of being rebuilt.

/// Lifetime counters for a pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Items handed out by `acquire`
    pub acquired: u64,
    /// Items handed back through `release` (pooled or discarded)
    pub released: u64,
    /// Items built by the factory because the pool was empty
    pub created: u64,
    /// Items rejected by `release` because the pool was full
    pub discarded: u64,
}

/// Bounded LIFO pool
#[derive(Debug, Clone)]
pub struct ObjectPool<T> {
    items: Vec<T>,
    capacity: usize,
    stats: PoolStats,
}

impl<T> ObjectPool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            stats: PoolStats::default(),
        }
    }

    /// Pop the most recently released item, or build one with `factory`
    pub fn acquire(&mut self, factory: impl FnOnce() -> T) -> T {
        self.stats.acquired += 1;
        match self.items.pop() {
            Some(item) => item,
            None => {
                self.stats.created += 1;
                factory()
            }
        }
    }

    /// Return an item to the pool.
    ///
    /// When the pool is already at capacity the item is handed back so the
    /// caller can dispose of it; it will never be returned by `acquire`.
    #[must_use = "a rejected item must be disposed of by the caller"]
    pub fn release(&mut self, item: T) -> Option<T> {
        self.stats.released += 1;
        if self.items.len() >= self.capacity {
            self.stats.discarded += 1;
            return Some(item);
        }
        self.items.push(item);
        None
    }

    /// Number of items currently checked out
    pub fn live(&self) -> u64 {
        self.stats.acquired - self.stats.released
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_acquire_empty_uses_factory() {
        let mut pool: ObjectPool<u32> = ObjectPool::new(4);
        let item = pool.acquire(|| 7);
        assert_eq!(item, 7);
        assert_eq!(pool.stats().created, 1);
        assert_eq!(pool.live(), 1);
    }

    #[test]
    fn test_lifo_order() {
        let mut pool = ObjectPool::new(4);
        assert!(pool.release(1).is_none());
        assert!(pool.release(2).is_none());
        assert_eq!(pool.acquire(|| 0), 2);
        assert_eq!(pool.acquire(|| 0), 1);
        // Empty again - falls through to the factory
        assert_eq!(pool.acquire(|| 99), 99);
    }

    #[test]
    fn test_release_over_capacity_discards() {
        let mut pool = ObjectPool::new(5);
        for i in 0..5 {
            assert!(pool.release(i).is_none());
        }
        let rejected = pool.release(5);
        assert_eq!(rejected, Some(5));
        assert_eq!(pool.len(), 5);
        assert_eq!(pool.stats().discarded, 1);

        // The sixth item never comes back out
        let mut drained = Vec::new();
        while !pool.is_empty() {
            drained.push(pool.acquire(|| -1));
        }
        assert!(!drained.contains(&5));
        assert_eq!(drained, vec![4, 3, 2, 1, 0]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Acquire,
        Release,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Acquire), Just(Op::Release)]
    }

    proptest! {
        #[test]
        fn prop_live_count_and_capacity(capacity in 0usize..16, ops in prop::collection::vec(op(), 0..200)) {
            let mut pool = ObjectPool::new(capacity);
            let mut checked_out: Vec<u32> = Vec::new();
            let mut next = 0u32;
            let mut acquires = 0u64;
            let mut releases = 0u64;

            for op in ops {
                match op {
                    Op::Acquire => {
                        let item = pool.acquire(|| { next += 1; next });
                        checked_out.push(item);
                        acquires += 1;
                    }
                    Op::Release => {
                        if let Some(item) = checked_out.pop() {
                            let _ = pool.release(item);
                            releases += 1;
                        }
                    }
                }
                prop_assert_eq!(pool.live(), acquires - releases);
                prop_assert_eq!(pool.live(), checked_out.len() as u64);
                prop_assert!(pool.len() <= capacity);
            }
        }
    }
}
