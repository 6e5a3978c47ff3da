//! Contiguous-run pool allocator
//!
//! A fixed number of pools sharing one chunk layout. Requests larger than a
//! single chunk are served by a first-fit search for a run of adjacent free
//! chunks; release reverses the search with plain address arithmetic.
//!
//! ## Modules
//! - `allocator` - Run search, capacity accounting and the release path
//! - `chunk_map` - Per-pool chunk descriptors and run operations
//! - `config` - `(pool_size, chunk_size, pool_count)` configuration

pub mod allocator;
pub(crate) mod chunk_map;
pub mod config;

pub use allocator::ContiguousPoolAllocator;
pub use config::ContiguousConfig;
