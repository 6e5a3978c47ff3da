//! Size-routed allocator configuration

use crate::error::{PoolError, Result};

/// One pool specification: how many chunks and how large each chunk is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSpec {
    /// Number of chunks the pool holds
    pub chunk_count: usize,
    /// Size of each chunk in bytes; doubles as the pool's size class
    pub chunk_size: usize,
}

/// Configuration for [`PoolRegistry`](crate::sized::PoolRegistry)
///
/// One [`PoolSpec`] per pool. Duplicate chunk sizes are permitted; the
/// registry keeps them as separate pools and visits both during routing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizedConfig {
    /// Pool specifications, in any order
    pub pools: Vec<PoolSpec>,
}

impl SizedConfig {
    /// Creates an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one pool of `chunk_count` chunks of `chunk_size` bytes
    #[must_use]
    pub fn with_pool(mut self, chunk_count: usize, chunk_size: usize) -> Self {
        self.pools.push(PoolSpec {
            chunk_count,
            chunk_size,
        });
        self
    }

    /// Builds a configuration from `(chunk_count, chunk_size)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        Self {
            pools: pairs
                .into_iter()
                .map(|(chunk_count, chunk_size)| PoolSpec {
                    chunk_count,
                    chunk_size,
                })
                .collect(),
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.pools.is_empty() {
            return Err(PoolError::invalid_config("at least one pool is required"));
        }
        for spec in &self.pools {
            if spec.chunk_count == 0 {
                return Err(PoolError::invalid_config("chunk count must be non-zero"));
            }
            if spec.chunk_size == 0 {
                return Err(PoolError::invalid_config("chunk size must be non-zero"));
            }
        }
        Ok(())
    }
}
