//! A single fixed-chunk-size memory pool
//!
//! # Safety
//!
//! The pool owns one contiguous region acquired at construction and released
//! on drop. Chunk addresses are derived once, as `base + i * chunk_size`,
//! and only ever handed out while the chunk is marked occupied.
//!
//! ## Invariants
//!
//! - `chunk_size` and `chunk_count` are constant for the pool's lifetime
//! - `used_chunks <= chunk_count`
//! - `used_chunks + free manager count == chunk_count`

use tracing::trace;

use crate::error::{PoolError, Result};
use crate::sized::free_chunks::FreeChunkManager;
use crate::utils::OwnedRegion;

/// One contiguous memory region sliced into equal-size chunks
#[derive(Debug)]
pub struct Pool {
    region: OwnedRegion,
    chunk_size: usize,
    chunk_count: usize,
    used_chunks: usize,
    free_chunks: FreeChunkManager,
}

impl Pool {
    /// Creates a pool of `chunk_count` chunks of `chunk_size` bytes each
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidConfig`] for a zero count or size, or
    /// when the total size overflows.
    pub fn new(chunk_count: usize, chunk_size: usize) -> Result<Self> {
        if chunk_count == 0 {
            return Err(PoolError::invalid_config("chunk count must be non-zero"));
        }
        if chunk_size == 0 {
            return Err(PoolError::invalid_config("chunk size must be non-zero"));
        }
        let total = chunk_count.checked_mul(chunk_size).ok_or_else(|| {
            PoolError::invalid_config(format!(
                "pool of {chunk_count} chunks x {chunk_size} bytes overflows"
            ))
        })?;

        let region = OwnedRegion::acquire(total)?;
        let mut free_chunks = FreeChunkManager::new();
        free_chunks.reset(chunk_count);
        for i in 0..chunk_count {
            free_chunks.register_address(region.base_addr() + i * chunk_size);
        }

        trace!(chunk_count, chunk_size, base = region.base_addr(), "pool created");
        Ok(Self {
            region,
            chunk_size,
            chunk_count,
            used_chunks: 0,
            free_chunks,
        })
    }

    /// True iff at least one chunk can still be handed out
    ///
    /// Both counters are maintained independently and must agree, so both
    /// are checked.
    pub fn has_capacity(&self) -> bool {
        self.used_chunks < self.chunk_count && self.free_chunks.free_count() > 0
    }

    /// Hands out one free chunk's base address
    pub(crate) fn allocate_one(&mut self) -> Result<usize> {
        let addr = self
            .free_chunks
            .acquire()
            .ok_or_else(|| PoolError::out_of_memory(self.chunk_size, 0))?;
        self.used_chunks += 1;
        Ok(addr)
    }

    /// Returns a chunk to the pool
    ///
    /// # Errors
    /// Rejects addresses that are not a chunk of this pool and chunks that
    /// are already free, without touching any counter.
    pub(crate) fn release(&mut self, addr: usize) -> Result<()> {
        self.free_chunks.release(addr)?;
        self.used_chunks -= 1;
        Ok(())
    }

    /// Checks whether `addr` is a chunk boundary inside this pool
    pub fn contains(&self, addr: usize) -> bool {
        let base = self.region.base_addr();
        addr >= base && addr < base + self.region.len() && (addr - base) % self.chunk_size == 0
    }

    /// Size of each chunk in bytes
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Total number of chunks
    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Chunks currently handed out
    pub fn used_chunks(&self) -> usize {
        self.used_chunks
    }

    /// Chunks currently free
    pub fn free_chunks(&self) -> usize {
        self.free_chunks.free_count()
    }
}
