//! Contiguous-run allocator configuration

use crate::error::{PoolError, Result};

/// Configuration for
/// [`ContiguousPoolAllocator`](crate::contiguous::ContiguousPoolAllocator)
///
/// All pools share one chunk layout: `pool_count` pools of `pool_size`
/// bytes, each sliced into `pool_size / chunk_size` chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContiguousConfig {
    /// Size of each pool in bytes; must be a multiple of `chunk_size`
    pub pool_size: usize,
    /// Size of each chunk in bytes
    pub chunk_size: usize,
    /// Number of pools
    pub pool_count: usize,
}

impl ContiguousConfig {
    /// Creates a configuration
    pub fn new(pool_size: usize, chunk_size: usize, pool_count: usize) -> Self {
        Self {
            pool_size,
            chunk_size,
            pool_count,
        }
    }

    /// Chunks in each pool
    pub fn chunks_per_pool(&self) -> usize {
        self.pool_size / self.chunk_size
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(PoolError::invalid_config("pool size must be non-zero"));
        }
        if self.chunk_size == 0 {
            return Err(PoolError::invalid_config("chunk size must be non-zero"));
        }
        if self.pool_count == 0 {
            return Err(PoolError::invalid_config("pool count must be non-zero"));
        }
        if !self.pool_size.is_multiple_of(self.chunk_size) {
            return Err(PoolError::invalid_config(format!(
                "pool size {} is not a multiple of chunk size {}",
                self.pool_size, self.chunk_size
            )));
        }
        Ok(())
    }
}

impl Default for ContiguousConfig {
    /// One 16 KiB pool of 128-byte chunks
    fn default() -> Self {
        Self {
            pool_size: 16384,
            chunk_size: 128,
            pool_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_configuration_is_valid() {
        let config = ContiguousConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunks_per_pool(), 128);
    }

    #[test]
    fn pool_size_must_divide_evenly() {
        assert!(ContiguousConfig::new(100, 8, 1).validate().is_err());
        assert!(ContiguousConfig::new(96, 8, 1).validate().is_ok());
    }

    #[test]
    fn zero_fields_are_rejected() {
        assert!(ContiguousConfig::new(0, 8, 1).validate().is_err());
        assert!(ContiguousConfig::new(32, 0, 1).validate().is_err());
        assert!(ContiguousConfig::new(32, 8, 0).validate().is_err());
    }
}
