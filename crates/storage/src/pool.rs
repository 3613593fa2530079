//! Thread-local record allocator cache
//!
//! Mirrors `original_source/cache.hpp`'s `RecordMemoryCache<Record>`: a
//! bounded, thread-local free list that recycles record-sized allocations
//! on the hot insert/update/delete paths. This is an optimization, not a
//! correctness requirement — every caller must work correctly if
//! [`RecordPool::allocate`] always falls back to its default and
//! [`RecordPool::recycle`] silently drops the value.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

/// Default bound on the number of recycled records kept per type,
/// matching the `n = 30` constant in `original_source/cache.hpp`.
pub const DEFAULT_POOL_BOUND: usize = 30;

thread_local! {
    static POOLS: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Thread-local, type-keyed record allocator cache.
///
/// One bounded free list is kept per record type `T`, indexed by
/// `TypeId` within a single `thread_local!` map (the Rust idiom for "one
/// thread-local slot per type" without hand-declaring a `thread_local!`
/// static for each of the eight poolable record types).
pub struct RecordPool;

impl RecordPool {
    /// Take a recycled record of type `T` if the free list is non-empty,
    /// otherwise build one with `default`.
    pub fn allocate<T: 'static>(default: impl FnOnce() -> T) -> T {
        Self::with_deque::<T, _, _>(|deque| deque.pop_back()).unwrap_or_else(default)
    }

    /// Return a record to the free list for type `T`. If the list exceeds
    /// [`DEFAULT_POOL_BOUND`], the oldest entry is dropped.
    pub fn recycle<T: 'static>(value: T) {
        Self::with_deque::<T, _, _>(|deque| {
            deque.push_back(value);
            if deque.len() > DEFAULT_POOL_BOUND {
                deque.pop_front();
            }
        });
    }

    /// Number of recycled records currently cached for type `T` (test hook).
    pub fn len<T: 'static>() -> usize {
        Self::with_deque::<T, _, _>(|deque| deque.len()).unwrap_or(0)
    }

    fn with_deque<T: 'static, F, R>(f: F) -> R
    where
        F: FnOnce(&mut VecDeque<T>) -> R,
    {
        POOLS.with(|pools| {
            let mut pools = pools.borrow_mut();
            let entry = pools
                .entry(TypeId::of::<T>())
                .or_insert_with(|| Box::new(VecDeque::<T>::new()));
            let deque = entry
                .downcast_mut::<VecDeque<T>>()
                .expect("record pool type mismatch");
            f(deque)
        })
    }
}
