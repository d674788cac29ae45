use alloc::vec::Vec;
use core::fmt;
use tracing::{debug, trace};

use crate::block::{is_lower_buddy, next_power_of_two, Block, BlockInfo};
use crate::config::{Config, MergePolicy, DEFAULT_CAPACITY};
use crate::error::{AllocationFailure, FreeFailure, InvalidArgument};

/// Names one allocation made by a [`BuddyAllocator`].
///
/// Every allocation gets a fresh id, so a handle that was already freed never
/// matches a later allocation that happens to reuse the same block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockHandle {
    id: u64,
    offset: usize,
    size: usize,
    requested: usize,
}

impl BlockHandle {
    /// Size of the block that was handed out, in KB
    pub fn size(&self) -> usize {
        self.size
    }

    /// Offset of the block from the start of the pool, in KB
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The size that was asked for before rounding
    pub fn requested(&self) -> usize {
        self.requested
    }
}

/// Usage summary of a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
    /// Total pool size
    pub capacity: usize,
    /// Sum of allocated block sizes
    pub allocated: usize,
    /// Sum of free block sizes
    pub free: usize,
    /// Size of the largest free block, the biggest request that can succeed
    pub largest_free: usize,
    /// Number of blocks in the list
    pub block_count: usize,
    /// Number of allocated blocks
    pub allocation_count: usize,
    /// Space lost to rounding requests up to a power of two
    pub internal_fragmentation: usize,
}

/// A buddy system allocator over a simulated pool.
///
/// The pool is a list of power of two blocks in address order. Requests are
/// rounded up and served first fit, splitting larger blocks in halves. Freed
/// blocks are merged back with their neighbours until nothing more can merge.
pub struct BuddyAllocator {
    capacity: usize,
    merge_policy: MergePolicy,
    blocks: Vec<Block>,
    next_id: u64,
}

impl BuddyAllocator {
    /// Create a pool of `capacity` KB as one free block
    pub fn new(capacity: usize) -> Result<Self, InvalidArgument> {
        Self::with_config(Config::new(capacity))
    }

    /// Create a pool from a full [`Config`]
    pub fn with_config(config: Config) -> Result<Self, InvalidArgument> {
        let Config {
            capacity,
            merge_policy,
        } = config;
        if capacity == 0 {
            return Err(InvalidArgument::ZeroSize);
        }
        if !capacity.is_power_of_two() {
            return Err(InvalidArgument::CapacityNotPowerOfTwo(capacity));
        }
        Ok(Self::whole(capacity, merge_policy))
    }

    /// `capacity` must already be a non zero power of two
    fn whole(capacity: usize, merge_policy: MergePolicy) -> Self {
        let mut blocks = Vec::new();
        blocks.push(Block::free(capacity));
        Self {
            capacity,
            merge_policy,
            blocks,
            next_id: 1,
        }
    }

    /// Total pool size in KB
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The merge rule applied after each free
    pub fn merge_policy(&self) -> MergePolicy {
        self.merge_policy
    }

    /// Allocate a block of at least `request` KB.
    ///
    /// The request is rounded up to a power of two and the first free block
    /// large enough is split down to that size.
    pub fn allocate(&mut self, request: usize) -> Result<BlockHandle, AllocationFailure> {
        let block_size = self.block_size_for(request)?;

        let Some((index, offset)) = self.find_free(block_size) else {
            debug!(request, block_size, "allocation failed, not enough memory");
            return Err(AllocationFailure::OutOfMemory {
                requested: request,
                block_size,
            });
        };

        self.split(index, block_size);

        let id = self.next_id;
        self.next_id += 1;
        self.blocks[index].mark_allocated(id, request);

        debug!(request, block_size, offset, "allocated");
        Ok(BlockHandle {
            id,
            offset,
            size: block_size,
            requested: request,
        })
    }

    /// Free the block named by `handle` and coalesce
    pub fn free(&mut self, handle: BlockHandle) -> Result<(), FreeFailure> {
        let index = self
            .blocks
            .iter()
            .position(|block| block.allocated() && block.id == handle.id)
            .ok_or(FreeFailure::NotFound)?;

        self.release(index);
        Ok(())
    }

    /// Free the first allocated block of exactly `size` KB and coalesce.
    ///
    /// When several allocations share that size, any one of them may be freed.
    /// Prefer [`free`](Self::free) with the handle from `allocate`.
    pub fn free_by_size(&mut self, size: usize) -> Result<(), FreeFailure> {
        self.check_size(size)?;
        let index = self
            .blocks
            .iter()
            .position(|block| block.allocated() && block.size == size)
            .ok_or(FreeFailure::NotFound)?;

        self.release(index);
        Ok(())
    }

    /// The blocks in address order
    pub fn blocks(&self) -> impl Iterator<Item = BlockInfo> + '_ {
        self.offsets().map(|(_, offset, block)| BlockInfo {
            offset,
            size: block.size,
            status: block.status(),
        })
    }

    /// A copy of the current block list in address order
    pub fn snapshot(&self) -> Vec<BlockInfo> {
        self.blocks().collect()
    }

    /// Usage totals for the pool
    pub fn stats(&self) -> PoolStats {
        let mut stats = PoolStats {
            capacity: self.capacity,
            allocated: 0,
            free: 0,
            largest_free: 0,
            block_count: self.blocks.len(),
            allocation_count: 0,
            internal_fragmentation: 0,
        };

        for block in &self.blocks {
            if block.allocated() {
                stats.allocated += block.size;
                stats.allocation_count += 1;
                stats.internal_fragmentation += block.size - block.requested;
            } else {
                stats.free += block.size;
                stats.largest_free = stats.largest_free.max(block.size);
            }
        }
        stats
    }

    fn check_size(&self, size: usize) -> Result<(), InvalidArgument> {
        if size == 0 {
            return Err(InvalidArgument::ZeroSize);
        }
        if size > self.capacity {
            return Err(InvalidArgument::ExceedsCapacity {
                requested: size,
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    fn block_size_for(&self, request: usize) -> Result<usize, InvalidArgument> {
        self.check_size(request)?;
        // capacity is a power of two, so the rounded size stays within it
        next_power_of_two(request).ok_or(InvalidArgument::ZeroSize)
    }

    /// Index, offset and block, in address order
    fn offsets(&self) -> impl Iterator<Item = (usize, usize, &Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .scan(0, |offset, (index, block)| {
                let at = *offset;
                *offset += block.size;
                Some((index, at, block))
            })
    }

    /// First free block of at least `size`, as (index, offset)
    fn find_free(&self, size: usize) -> Option<(usize, usize)> {
        self.offsets()
            .find(|(_, _, block)| !block.allocated() && block.size >= size)
            .map(|(index, offset, _)| (index, offset))
    }

    /// Halve the block at `index` until it is `size`, the upper halves stay free
    fn split(&mut self, index: usize, size: usize) {
        while self.blocks[index].size > size {
            let half = self.blocks[index].size / 2;
            self.blocks[index].size = half;
            self.blocks.insert(index + 1, Block::free(half));
            trace!(index, half, "split block");
        }
    }

    fn release(&mut self, index: usize) {
        let block = &mut self.blocks[index];
        debug!(size = block.size, requested = block.requested, "freed");
        block.mark_free();
        self.coalesce();
    }

    /// Merge neighbours until no pair is left
    fn coalesce(&mut self) {
        let mut index = 0;
        let mut offset = 0;
        while index + 1 < self.blocks.len() {
            let left = self.blocks[index];
            let right = self.blocks[index + 1];
            if !self.can_merge(offset, &left, &right) {
                offset += left.size;
                index += 1;
                continue;
            }

            self.blocks[index].size = left.size * 2;
            self.blocks.remove(index + 1);
            trace!(offset, size = left.size * 2, "merged blocks");

            // the grown block may now pair with the one before it
            if index > 0 {
                index -= 1;
                offset -= self.blocks[index].size;
            }
        }
    }

    fn can_merge(&self, offset: usize, left: &Block, right: &Block) -> bool {
        if left.allocated() || right.allocated() || left.size != right.size {
            return false;
        }
        match self.merge_policy {
            MergePolicy::Buddy => is_lower_buddy(offset, left.size),
            MergePolicy::Adjacent => true,
        }
    }
}

impl Default for BuddyAllocator {
    fn default() -> Self {
        Self::whole(DEFAULT_CAPACITY, MergePolicy::default())
    }
}

impl fmt::Display for BuddyAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Current Memory State:")?;
        for block in self.blocks() {
            writeln!(f, "{block}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for BuddyAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.blocks()).finish()
    }
}
