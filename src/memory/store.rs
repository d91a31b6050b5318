//! The process-wide heap used by generated code
//!
//! Generated code has no way to thread a heap through its calls so
//! one [`Heap`] lives behind a lock for the life of the process. It
//! starts uninitialised; `initialize` acquires the region and every
//! later call is a no-op, so the region is never leaked or replaced.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::heap::{Handle, Heap, HeapConfig, HeapError, HeapStats};

/// Heap state: uninitialised until the first `initialize`, then ready
/// for the rest of the process
#[derive(Debug, Default)]
pub enum HeapStore {
    #[default]
    Uninitialized,
    Ready(Heap),
}

impl HeapStore {
    /// Acquire the region if not already done
    pub fn initialize(&mut self, config: &HeapConfig) -> Result<(), HeapError> {
        if let HeapStore::Uninitialized = self {
            *self = HeapStore::Ready(Heap::with_config(config)?);
        }
        Ok(())
    }

    pub fn allocate(&self, size_in_bytes: u64) -> Result<Handle, HeapError> {
        self.heap()?.allocate(size_in_bytes)
    }

    pub fn heap(&self) -> Result<&Heap, HeapError> {
        match self {
            HeapStore::Ready(heap) => Ok(heap),
            HeapStore::Uninitialized => Err(HeapError::NotInitialized),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, HeapStore::Ready(_))
    }
}

lazy_static! {
    static ref HEAP_STORE: Mutex<HeapStore> = Mutex::new(HeapStore::default());
}

fn store() -> MutexGuard<'static, HeapStore> {
    // No operation can leave the store half-updated
    HEAP_STORE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Initialise the process heap with [`HEAP_SIZE`](super::HEAP_SIZE) bytes
pub fn initialize() -> Result<(), HeapError> {
    store().initialize(&HeapConfig::default())
}

/// Allocate from the process heap
pub fn allocate(size_in_bytes: u64) -> Result<Handle, HeapError> {
    store().allocate(size_in_bytes)
}

/// Current `(free_ptr, heap_end)` addresses of the process heap
pub fn bounds() -> Option<(*mut u64, *mut u64)> {
    store()
        .heap()
        .ok()
        .map(|heap| (heap.free_ptr(), heap.heap_end()))
}

pub fn stats() -> Option<HeapStats> {
    store().heap().ok().map(Heap::stats)
}

#[cfg(test)]
mod tests {

    use super::*;

    fn small() -> HeapConfig {
        HeapConfig::default().with_heap_size(64)
    }

    #[test]
    fn test_uninitialized_store() {
        let store = HeapStore::default();
        assert!(!store.is_ready());
        assert_eq!(store.allocate(8).unwrap_err(), HeapError::NotInitialized);
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let mut store = HeapStore::default();
        store.initialize(&small()).unwrap();
        let first = store.allocate(8).unwrap();
        store.initialize(&small()).unwrap();
        let second = store.allocate(8).unwrap();
        assert_eq!(first.offset(), 0);
        assert_eq!(second.offset(), 1);
        assert_eq!(store.heap().unwrap().cursor(), 2);
    }

    #[test]
    fn test_failed_initialize_stays_uninitialized() {
        let mut store = HeapStore::default();
        let bad = HeapConfig::default().with_heap_size(3);
        assert_eq!(
            store.initialize(&bad).unwrap_err(),
            HeapError::BadConfiguration { size: 3 }
        );
        assert!(!store.is_ready());
        store.initialize(&small()).unwrap();
        assert!(store.is_ready());
    }

    #[test]
    fn test_process_heap() {
        initialize().unwrap();
        initialize().unwrap();
        let a = allocate(24).unwrap();
        let b = allocate(8).unwrap();
        assert!(b.offset() >= a.offset() + 3);
        let (free, end) = bounds().unwrap();
        assert!(free <= end);
        assert!(stats().unwrap().allocations >= 2);
    }
}
