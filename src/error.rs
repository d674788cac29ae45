use thiserror::Error;

/// Input rejected before the pool is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidArgument {
    /// A size of zero was given
    #[error("size must be greater than zero")]
    ZeroSize,
    /// The size is larger than the whole pool
    #[error("{requested}KB exceeds the pool capacity of {capacity}KB")]
    ExceedsCapacity {
        /// The size asked for
        requested: usize,
        /// Total size of the pool
        capacity: usize,
    },
    /// A pool can only be built from a power of two
    #[error("pool capacity {0}KB is not a power of two")]
    CapacityNotPowerOfTwo(usize),
}

/// Why an allocation did not happen, the pool is unchanged in every case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocationFailure {
    /// No free block is large enough right now
    #[error("allocation failed for {requested}KB, no free {block_size}KB block")]
    OutOfMemory {
        /// The size asked for
        requested: usize,
        /// The rounded block size that was searched for
        block_size: usize,
    },
    /// The request size itself is not valid for this pool
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}

/// Why a free did not happen, the pool is unchanged in every case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FreeFailure {
    /// No allocated block matches
    #[error("free failed, block not found")]
    NotFound,
    /// The size given to a size based free is not valid for this pool
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),
}
