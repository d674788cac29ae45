use alloc::vec::Vec;
use spin::{Mutex, MutexGuard};

use crate::block::BlockInfo;
use crate::buddy::{BlockHandle, BuddyAllocator, PoolStats};
use crate::error::{AllocationFailure, FreeFailure};

/// An allocator that can be shared, every operation holds the lock for its whole run
pub type SharedAllocator = Locked<BuddyAllocator>;

/// Wraps a pool in a spin lock so callers on several threads see each operation whole.
///
/// Splits and merges change the block list step by step, so nothing may observe
/// the list while one of them runs.
#[derive(Debug)]
pub struct Locked<T> {
    inner: Mutex<T>,
}

impl<T> Locked<T> {
    /// Put `inner` behind the lock
    pub const fn new(inner: T) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    /// Hold the lock for a run of several operations
    pub fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.lock()
    }

    /// Give back the wrapped value
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl Locked<BuddyAllocator> {
    /// See [`BuddyAllocator::allocate`]
    pub fn allocate(&self, request: usize) -> Result<BlockHandle, AllocationFailure> {
        self.lock().allocate(request)
    }

    /// See [`BuddyAllocator::free`]
    pub fn free(&self, handle: BlockHandle) -> Result<(), FreeFailure> {
        self.lock().free(handle)
    }

    /// See [`BuddyAllocator::free_by_size`]
    pub fn free_by_size(&self, size: usize) -> Result<(), FreeFailure> {
        self.lock().free_by_size(size)
    }

    /// See [`BuddyAllocator::snapshot`]
    pub fn snapshot(&self) -> Vec<BlockInfo> {
        self.lock().snapshot()
    }

    /// See [`BuddyAllocator::stats`]
    pub fn stats(&self) -> PoolStats {
        self.lock().stats()
    }
}
