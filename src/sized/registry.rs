//! Size-routed pool registry
//!
//! A sorted collection of `(chunk_size, Pool)` built once at construction.
//! Requests are routed by lower-bound binary search over the chunk sizes,
//! then scanned forward for capacity. Outstanding allocations are tracked in
//! an address map so release never re-scans the pools.
//!
//! ## Invariants
//!
//! - The pool list is sorted ascending by chunk size and never re-sorted
//! - Every map entry points at the pool that handed the address out
//! - A map entry exists iff the allocation is outstanding

use core::ptr::NonNull;

use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::error::{PoolError, Result};
use crate::sized::config::SizedConfig;
use crate::sized::pool::Pool;
use crate::sized::stats::{PoolUsage, RegistryStats};
use crate::traits::{MemoryUsage, RawAllocator};

/// Size-routed pool allocator
///
/// Each pool holds chunks of one fixed size. A request goes to the smallest
/// pool whose chunk size can hold it; if that pool is full, strictly larger
/// size classes are probed in order. Smaller classes are never revisited.
#[derive(Debug)]
pub struct PoolRegistry {
    /// `(chunk_size, pool)`, sorted ascending by chunk size
    pools: Vec<(usize, Pool)>,
    /// Outstanding allocation address to owning pool index
    outstanding: HashMap<usize, usize>,
}

impl PoolRegistry {
    /// Builds the registry from a configuration
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidConfig`] for an empty configuration or
    /// any zero-sized or zero-count pool.
    pub fn new(config: &SizedConfig) -> Result<Self> {
        config.validate()?;
        let mut pools = Vec::with_capacity(config.pools.len());
        for spec in &config.pools {
            pools.push((spec.chunk_size, Pool::new(spec.chunk_count, spec.chunk_size)?));
        }
        // Stable sort keeps duplicate size classes in configuration order.
        pools.sort_by_key(|(chunk_size, _)| *chunk_size);
        debug!(pool_count = pools.len(), "pool registry created");
        Ok(Self {
            pools,
            outstanding: HashMap::new(),
        })
    }

    /// Allocates a chunk able to hold `requested` bytes
    ///
    /// # Errors
    /// Returns [`PoolError::OutOfMemory`] when no qualifying pool has
    /// capacity, including requests larger than every size class. Nothing is
    /// mutated on the failing path.
    pub fn allocate(&mut self, requested: usize) -> Result<NonNull<u8>> {
        if requested == 0 {
            return Err(PoolError::invalid_config("zero-byte allocation request"));
        }
        // Lower bound: left-most pool whose chunk size holds the request.
        let start = self
            .pools
            .partition_point(|(chunk_size, _)| *chunk_size < requested);
        for index in start..self.pools.len() {
            let (chunk_size, pool) = &mut self.pools[index];
            if pool.has_capacity() {
                let chunk_size = *chunk_size;
                let addr = pool.allocate_one()?;
                self.outstanding.insert(addr, index);
                trace!(requested, chunk_size, pool = index, addr, "allocation routed");
                // SAFETY: addr points into a pool region returned by the
                // system allocator, so it is never null.
                return Ok(unsafe { NonNull::new_unchecked(addr as *mut u8) });
            }
        }
        trace!(requested, "no qualifying pool has capacity");
        Err(PoolError::out_of_memory(requested, self.available_bytes()))
    }

    /// Returns a chunk to its owning pool and forgets the address
    ///
    /// # Errors
    /// Returns [`PoolError::InvalidDeallocation`] when `ptr` is not a
    /// currently outstanding allocation of this registry.
    pub fn deallocate(&mut self, ptr: NonNull<u8>) -> Result<()> {
        let addr = ptr.as_ptr() as usize;
        let index = self.outstanding.get(&addr).copied().ok_or_else(|| {
            PoolError::invalid_dealloc(addr, "address is not an outstanding allocation")
        })?;
        let (_, pool) = &mut self.pools[index];
        debug_assert!(pool.contains(addr));
        pool.release(addr)?;
        // Dropping the entry here is what keeps the map bounded and keeps a
        // reused address from being attributed to a stale pool.
        self.outstanding.remove(&addr);
        trace!(addr, pool = index, "allocation released");
        Ok(())
    }

    /// Number of pools in the registry
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Allocations currently outstanding
    pub fn outstanding_allocations(&self) -> usize {
        self.outstanding.len()
    }

    /// Per-pool occupancy in routing order
    pub fn pool_usage(&self) -> Vec<PoolUsage> {
        self.pools
            .iter()
            .map(|(chunk_size, pool)| PoolUsage {
                chunk_size: *chunk_size,
                chunk_count: pool.chunk_count(),
                used_chunks: pool.used_chunks(),
                free_chunks: pool.free_chunks(),
            })
            .collect()
    }

    /// Snapshot of overall usage
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            pool_count: self.pool_count(),
            outstanding_allocations: self.outstanding.len(),
            used_bytes: self.used_bytes(),
            available_bytes: self.available_bytes(),
            total_bytes: self.total_bytes(),
        }
    }
}

impl RawAllocator for PoolRegistry {
    fn allocate_bytes(&mut self, bytes: usize) -> Result<NonNull<u8>> {
        self.allocate(bytes)
    }

    /// The byte count is not needed on release; the owning pool is recorded
    /// in the address map at allocation time.
    fn deallocate_bytes(&mut self, ptr: NonNull<u8>, _bytes: usize) -> Result<()> {
        self.deallocate(ptr)
    }
}

impl MemoryUsage for PoolRegistry {
    fn used_bytes(&self) -> usize {
        self.pools
            .iter()
            .map(|(chunk_size, pool)| pool.used_chunks() * chunk_size)
            .sum()
    }

    fn available_bytes(&self) -> usize {
        self.pools
            .iter()
            .map(|(chunk_size, pool)| pool.free_chunks() * chunk_size)
            .sum()
    }

    fn total_bytes(&self) -> usize {
        self.pools
            .iter()
            .map(|(chunk_size, pool)| pool.chunk_count() * chunk_size)
            .sum()
    }
}
