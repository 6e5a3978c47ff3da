//! Size-routed allocator statistics

/// Snapshot of a registry's overall usage
#[derive(Debug, Clone, Copy)]
pub struct RegistryStats {
    /// Number of pools in the registry
    pub pool_count: usize,
    /// Allocations currently outstanding across all pools
    pub outstanding_allocations: usize,
    /// Bytes handed out, counted at chunk granularity
    pub used_bytes: usize,
    /// Bytes still available
    pub available_bytes: usize,
    /// Total pool storage
    pub total_bytes: usize,
}

/// Per-pool occupancy, in routing order (ascending chunk size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolUsage {
    /// The pool's size class
    pub chunk_size: usize,
    /// Total chunks in the pool
    pub chunk_count: usize,
    /// Chunks currently handed out
    pub used_chunks: usize,
    /// Chunks currently free
    pub free_chunks: usize,
}
