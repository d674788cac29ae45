/// Pool size used by the simulator when none is given, in KB
pub const DEFAULT_CAPACITY: usize = 1024;

/// Decides which adjacent free blocks the coalescing pass may merge
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// Merge any two adjacent free blocks of equal size.
    ///
    /// After every free no two neighbouring free blocks share a size. This can
    /// join halves of different parents, after which the pool may never return
    /// to a single block.
    #[default]
    Adjacent,
    /// Merge only true buddies, the left block must sit at an offset aligned to
    /// twice its size.
    ///
    /// Every block stays aligned to its size, but two equal free neighbours
    /// from different parents are left apart.
    Buddy,
}

/// Construction parameters for a [`BuddyAllocator`](crate::BuddyAllocator)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Total pool size in KB, must be a power of two
    pub capacity: usize,
    /// Merge rule used after every free
    pub merge_policy: MergePolicy,
}

impl Config {
    /// A config for a pool of `capacity` KB with the default merge policy
    pub const fn new(capacity: usize) -> Self {
        Self {
            capacity,
            merge_policy: MergePolicy::Adjacent,
        }
    }

    /// Replace the merge policy
    pub const fn with_merge_policy(mut self, merge_policy: MergePolicy) -> Self {
        self.merge_policy = merge_policy;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
