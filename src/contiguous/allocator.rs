//! Contiguous-run pool allocator
//!
//! # Safety
//!
//! Each pool's region is acquired once at construction and released once on
//! drop. Addresses handed out always start on a chunk boundary and cover a
//! run of chunks marked occupied for exactly as long as the allocation is
//! outstanding.
//!
//! ## Invariants
//!
//! - Every pool has the identical `(chunk_size, chunk_count)` layout
//! - `remaining[i]` equals `chunk_size * free chunks` of pool `i`
//! - A release either frees a whole previously occupied run or nothing

use core::ptr::NonNull;

use tracing::{debug, trace};

use crate::contiguous::chunk_map::ChunkMap;
use crate::contiguous::config::ContiguousConfig;
use crate::error::{PoolError, Result};
use crate::traits::{MemoryUsage, RawAllocator};
use crate::utils::OwnedRegion;

/// Fixed-layout pool allocator that serves multi-chunk requests from runs of
/// adjacent free chunks
///
/// A request spanning more bytes than one chunk is satisfied by a first-fit
/// scan for enough consecutive free chunks, pool by pool in construction
/// order.
#[derive(Debug)]
pub struct ContiguousPoolAllocator {
    config: ContiguousConfig,
    /// One owned region per pool; kept alive for the allocator's lifetime
    regions: Vec<OwnedRegion>,
    maps: Vec<ChunkMap>,
    /// Remaining byte capacity per pool
    remaining: Vec<usize>,
}

impl ContiguousPoolAllocator {
    /// Builds `pool_count` pools of `pool_size / chunk_size` chunks each
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidConfig`] when `pool_size` is not a
    /// multiple of `chunk_size` or any field is zero.
    pub fn new(config: ContiguousConfig) -> Result<Self> {
        config.validate()?;
        let chunk_count = config.chunks_per_pool();
        let mut regions = Vec::with_capacity(config.pool_count);
        let mut maps = Vec::with_capacity(config.pool_count);
        for _ in 0..config.pool_count {
            let region = OwnedRegion::acquire(config.pool_size)?;
            maps.push(ChunkMap::new(region.base_addr(), config.chunk_size, chunk_count));
            regions.push(region);
        }
        debug!(
            pool_count = config.pool_count,
            pool_size = config.pool_size,
            chunk_size = config.chunk_size,
            "contiguous allocator created"
        );
        Ok(Self {
            config,
            regions,
            maps,
            remaining: vec![config.pool_size; config.pool_count],
        })
    }

    /// Builds the allocator with the default configuration
    pub fn with_default_config() -> Result<Self> {
        Self::new(ContiguousConfig::default())
    }

    /// Whole chunks required to cover `bytes`
    fn needed_chunks(&self, bytes: usize) -> usize {
        bytes.div_ceil(self.config.chunk_size)
    }

    /// Allocates a run of contiguous chunks able to hold `requested` bytes
    ///
    /// # Errors
    /// Returns [`PoolError::OutOfMemory`] when the request exceeds a single
    /// pool's size, exceeds the best remaining capacity, or no pool contains
    /// a long enough run of free chunks. Nothing is mutated on failure.
    pub fn allocate(&mut self, requested: usize) -> Result<NonNull<u8>> {
        if requested == 0 {
            return Err(PoolError::invalid_config("zero-byte allocation request"));
        }
        let best_remaining = self.remaining.iter().copied().max().unwrap_or(0);
        if requested > self.config.pool_size || requested > best_remaining {
            trace!(requested, best_remaining, "request exceeds pool capacity");
            return Err(PoolError::out_of_memory(requested, best_remaining));
        }

        let needed = self.needed_chunks(requested);
        for (pool, map) in self.maps.iter_mut().enumerate() {
            if let Some(start) = map.find_free_run(needed) {
                map.occupy_run(start, needed);
                self.remaining[pool] -= needed * self.config.chunk_size;
                let addr = map.addr_of(start);
                trace!(requested, needed, pool, start, addr, "run allocated");
                // SAFETY: addr points into a pool region returned by the
                // system allocator, so it is never null.
                return Ok(unsafe { NonNull::new_unchecked(addr as *mut u8) });
            }
        }
        trace!(requested, needed, "no pool contains a long enough free run");
        Err(PoolError::out_of_memory(requested, best_remaining))
    }

    /// Releases the run previously allocated at `ptr` for `bytes` bytes
    ///
    /// The owning pool and starting chunk come from address arithmetic, not
    /// a scan; the run length is recomputed exactly as in
    /// [`allocate`](Self::allocate).
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidDeallocation`] for an address outside
    /// every pool, off a chunk boundary, or a run containing an already-free
    /// chunk. In every case no bookkeeping changes.
    pub fn release(&mut self, ptr: NonNull<u8>, bytes: usize) -> Result<()> {
        let addr = ptr.as_ptr() as usize;
        if bytes == 0 {
            return Err(PoolError::invalid_dealloc(addr, "zero-byte release"));
        }
        let pool = self
            .maps
            .iter()
            .position(|map| map.contains(addr))
            .ok_or_else(|| PoolError::invalid_dealloc(addr, "address is outside every pool"))?;
        let start = self.maps[pool]
            .index_of(addr)
            .ok_or_else(|| PoolError::invalid_dealloc(addr, "address is not on a chunk boundary"))?;
        let needed = self.needed_chunks(bytes);
        self.maps[pool].release_run(start, needed)?;
        self.remaining[pool] += needed * self.config.chunk_size;
        trace!(addr, pool, start, needed, "run released");
        Ok(())
    }

    /// The allocator's configuration
    pub fn config(&self) -> ContiguousConfig {
        self.config
    }

    /// Number of pools
    pub fn pool_count(&self) -> usize {
        self.maps.len()
    }

    /// Remaining byte capacity of pool `pool`, if it exists
    pub fn remaining_bytes(&self, pool: usize) -> Option<usize> {
        self.remaining.get(pool).copied()
    }

    /// Free chunks in pool `pool`, if it exists
    pub fn free_chunks(&self, pool: usize) -> Option<usize> {
        self.maps.get(pool).map(ChunkMap::free_count)
    }
}

impl RawAllocator for ContiguousPoolAllocator {
    fn allocate_bytes(&mut self, bytes: usize) -> Result<NonNull<u8>> {
        self.allocate(bytes)
    }

    fn deallocate_bytes(&mut self, ptr: NonNull<u8>, bytes: usize) -> Result<()> {
        self.release(ptr, bytes)
    }
}

impl MemoryUsage for ContiguousPoolAllocator {
    fn used_bytes(&self) -> usize {
        self.total_bytes() - self.available_bytes()
    }

    fn available_bytes(&self) -> usize {
        self.remaining.iter().sum()
    }

    fn total_bytes(&self) -> usize {
        self.config.pool_size * self.regions.len()
    }
}
