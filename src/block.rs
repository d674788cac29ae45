use bitflags::bitflags;
use core::fmt;

bitflags! {
    /// Status bits kept in every block header
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct BlockFlags: u8 {
        /// The block is handed out to a caller
        const ALLOCATED = 0b1;
    }
}

/// One entry of the pool, its address is implied by its position in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Block {
    pub(crate) size: usize,
    pub(crate) flags: BlockFlags,
    /// Allocation id, only meaningful while allocated
    pub(crate) id: u64,
    /// Size the caller asked for, only meaningful while allocated
    pub(crate) requested: usize,
}

impl Block {
    /// A free block of `size`
    pub(crate) const fn free(size: usize) -> Self {
        Self {
            size,
            flags: BlockFlags::empty(),
            id: 0,
            requested: 0,
        }
    }

    pub(crate) fn allocated(&self) -> bool {
        self.flags.contains(BlockFlags::ALLOCATED)
    }

    pub(crate) fn status(&self) -> BlockStatus {
        if self.allocated() {
            BlockStatus::Allocated
        } else {
            BlockStatus::Free
        }
    }

    pub(crate) fn mark_allocated(&mut self, id: u64, requested: usize) {
        self.flags.insert(BlockFlags::ALLOCATED);
        self.id = id;
        self.requested = requested;
    }

    pub(crate) fn mark_free(&mut self) {
        *self = Self::free(self.size);
    }
}

/// Whether a block is in use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockStatus {
    /// Available for allocation
    Free,
    /// Handed out by `allocate` and not yet freed
    Allocated,
}

impl fmt::Display for BlockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => f.write_str("free"),
            Self::Allocated => f.write_str("allocated"),
        }
    }
}

/// Read only view of a block, as returned by the state queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Distance from the start of the pool in KB
    pub offset: usize,
    /// Block size in KB, always a power of two
    pub size: usize,
    /// Free or allocated
    pub status: BlockStatus,
}

impl fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}KB ({})", self.size, self.status)
    }
}

/// The smallest power of two that is greater than or equal to `n`.
///
/// Returns `None` for zero, which has no block size, and when the result
/// would not fit in a `usize`.
pub fn next_power_of_two(n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    n.checked_next_power_of_two()
}

/// True when a block of `size` at `offset` is the lower half of a `2 * size` parent
pub(crate) fn is_lower_buddy(offset: usize, size: usize) -> bool {
    offset % (size << 1) == 0
}
