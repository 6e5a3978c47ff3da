//! Capability traits shared by both allocator designs
//!
//! Container adapters are parameterized over [`RawAllocator`] alone; nothing
//! in the container layer needs to know which of the two designs is behind
//! the handle.

use core::ptr::NonNull;

use crate::error::Result;

/// The narrow allocate/deallocate contract containers program against
pub trait RawAllocator {
    /// Hands out the base address of a region able to hold `bytes` bytes
    ///
    /// # Errors
    /// Returns [`PoolError::OutOfMemory`](crate::PoolError::OutOfMemory)
    /// when no pool can satisfy the request. The failing path mutates no
    /// bookkeeping.
    fn allocate_bytes(&mut self, bytes: usize) -> Result<NonNull<u8>>;

    /// Returns a previously allocated region to its pool
    ///
    /// `bytes` must equal the size passed to the matching
    /// [`allocate_bytes`](RawAllocator::allocate_bytes) call.
    ///
    /// # Errors
    /// Returns
    /// [`PoolError::InvalidDeallocation`](crate::PoolError::InvalidDeallocation)
    /// when `ptr` is not a currently outstanding allocation (double free,
    /// foreign pointer, misaligned interior pointer).
    fn deallocate_bytes(&mut self, ptr: NonNull<u8>, bytes: usize) -> Result<()>;
}

/// Byte-level usage queries
pub trait MemoryUsage {
    /// Bytes currently handed out, counted at chunk granularity
    fn used_bytes(&self) -> usize;

    /// Bytes still available across all pools
    fn available_bytes(&self) -> usize;

    /// Total pool storage owned by the allocator
    fn total_bytes(&self) -> usize;
}
