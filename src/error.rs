//! Error types for chunk pool operations

use thiserror::Error;

/// Result type for pool operations
pub type Result<T> = std::result::Result<T, PoolError>;

/// Errors surfaced by the chunk pool allocators
///
/// Three classes of failure exist, and nothing else:
/// configuration errors at construction, capacity exhaustion during
/// allocation, and caller misuse during deallocation. No operation retries
/// internally and no operation leaves bookkeeping half-updated on failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PoolError {
    /// Construction parameters are unusable
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with the configuration
        message: String,
    },

    /// No pool can satisfy the request
    #[error("out of memory: requested {requested} bytes, {available} available")]
    OutOfMemory {
        /// Size of the failed request in bytes
        requested: usize,
        /// Bytes still available across all pools at the time of failure
        available: usize,
    },

    /// Release of an address that is not a currently outstanding allocation
    ///
    /// Covers double frees, foreign pointers and pointers that do not sit on
    /// a chunk boundary. The bookkeeping is left untouched.
    #[error("invalid deallocation of {addr:#x}: {reason}")]
    InvalidDeallocation {
        /// The offending address
        addr: usize,
        /// Why the address was rejected
        reason: &'static str,
    },
}

impl PoolError {
    /// Create a configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an out of memory error
    pub fn out_of_memory(requested: usize, available: usize) -> Self {
        Self::OutOfMemory {
            requested,
            available,
        }
    }

    /// Create an invalid deallocation error
    pub fn invalid_dealloc(addr: usize, reason: &'static str) -> Self {
        Self::InvalidDeallocation { addr, reason }
    }

    /// Checks whether this is a capacity exhaustion error
    pub fn is_out_of_memory(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. })
    }

    /// Checks whether this is a caller misuse error
    pub fn is_invalid_deallocation(&self) -> bool {
        matches!(self, Self::InvalidDeallocation { .. })
    }
}
