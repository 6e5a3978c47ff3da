//! Fixed-size chunk pool allocators for generic container types
//!
//! This crate provides two independent chunk-based allocator designs that
//! satisfy container allocation requests faster and with less fragmentation
//! than a general-purpose heap:
//!
//! - [`sized::PoolRegistry`] routes each request to the smallest pool whose
//!   fixed chunk size can hold it, then probes larger size classes for
//!   capacity.
//! - [`contiguous::ContiguousPoolAllocator`] keeps a fixed number of pools
//!   with one shared chunk layout and serves multi-chunk requests from runs
//!   of adjacent free chunks.
//!
//! Both designs acquire all pool memory once at construction, release it
//! once at destruction, and never resize a chunk. Containers hold an
//! [`AllocHandle`], a cheap copyable reference to shared pool storage whose
//! equality is storage identity.
//!
//! The allocators are deliberately single-threaded; concurrent use without
//! external synchronization is out of scope.
//!
//! # Example
//!
//! ```
//! use chunk_pool::{AllocHandle, PoolRegistry, SizedConfig};
//!
//! fn main() -> chunk_pool::Result<()> {
//!     let config = SizedConfig::new().with_pool(64, 8).with_pool(32, 64);
//!     let handle = AllocHandle::new(PoolRegistry::new(&config)?);
//!
//!     let ptr = handle.allocate_bytes(10)?; // routed to the 64-byte pool
//!     handle.deallocate_bytes(ptr, 10)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod contiguous;
pub mod error;
pub mod handle;
pub mod sized;
pub mod traits;

mod utils;

pub use contiguous::{ContiguousConfig, ContiguousPoolAllocator};
pub use error::{PoolError, Result};
pub use handle::AllocHandle;
pub use sized::{PoolRegistry, PoolSpec, SizedConfig};
pub use traits::{MemoryUsage, RawAllocator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
