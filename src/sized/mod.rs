//! Size-routed pool allocator
//!
//! A registry of pools, each holding chunks of one fixed size. A request is
//! routed to the smallest size class that can hold it, then probed forward
//! for capacity.
//!
//! ## Modules
//! - `config` - Pool specifications for registry construction
//! - `free_chunks` - Per-pool free-list with a round-robin scan cursor
//! - `pool` - One contiguous region sliced into equal chunks
//! - `registry` - Sorted size-class routing and the outstanding-address map
//! - `stats` - Usage snapshot types

pub mod config;
pub(crate) mod free_chunks;
pub mod pool;
pub mod registry;
pub mod stats;

pub use config::{PoolSpec, SizedConfig};
pub use pool::Pool;
pub use registry::PoolRegistry;
pub use stats::{PoolUsage, RegistryStats};
