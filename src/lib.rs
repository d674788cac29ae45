//! A buddy system allocator over a simulated memory pool

#![no_std]
#![deny(
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

extern crate alloc;

/// Block headers and the read only block view
mod block;
/// The allocator
mod buddy;
/// Construction parameters
mod config;
/// Error types
mod error;
/// Shared access behind a lock
mod locked;

pub use block::{next_power_of_two, BlockInfo, BlockStatus};
pub use buddy::{BlockHandle, BuddyAllocator, PoolStats};
pub use config::{Config, MergePolicy, DEFAULT_CAPACITY};
pub use error::{AllocationFailure, FreeFailure, InvalidArgument};
pub use locked::{Locked, SharedAllocator};
