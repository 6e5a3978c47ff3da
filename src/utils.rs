//! Shared helpers for the allocator implementations
//!
//! # Safety
//!
//! [`OwnedRegion`] is the only place in the crate that touches the system
//! allocator. A region is acquired once at construction and released exactly
//! once on drop; it is never resized or reallocated.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use crate::error::{PoolError, Result};

/// Alignment for every pool region
///
/// Chunk addresses are derived as `base + i * chunk_size`, so a chunk's
/// effective alignment is the greatest power of two dividing both this value
/// and the chunk size.
pub(crate) const REGION_ALIGN: usize = 16;

/// A raw memory block owned by exactly one pool for its whole lifetime
#[derive(Debug)]
pub(crate) struct OwnedRegion {
    base: NonNull<u8>,
    layout: Layout,
}

impl OwnedRegion {
    /// Acquires `size` bytes from the system allocator
    ///
    /// `size` must be non-zero; callers validate their configuration before
    /// reaching this point.
    pub(crate) fn acquire(size: usize) -> Result<Self> {
        debug_assert!(size > 0);
        let layout = Layout::from_size_align(size, REGION_ALIGN)
            .map_err(|_| PoolError::invalid_config(format!("pool size {size} overflows a layout")))?;
        // SAFETY: layout has non-zero size, validated by every caller.
        let raw = unsafe { alloc::alloc(layout) };
        let base = NonNull::new(raw).ok_or_else(|| PoolError::out_of_memory(size, 0))?;
        Ok(Self { base, layout })
    }

    /// Base address of the region
    pub(crate) fn base_addr(&self) -> usize {
        self.base.as_ptr() as usize
    }

    /// Region length in bytes
    pub(crate) fn len(&self) -> usize {
        self.layout.size()
    }
}

impl Drop for OwnedRegion {
    fn drop(&mut self) {
        // SAFETY: base came from alloc::alloc with this exact layout and is
        // released here for the first and only time.
        unsafe { alloc::dealloc(self.base.as_ptr(), self.layout) }
    }
}
