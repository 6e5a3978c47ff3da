//! Per-pool free chunk bookkeeping
//!
//! ## Invariants
//!
//! - Registered addresses are in physical layout order and never change
//!   after construction
//! - The scan cursor is always a valid slot index
//! - `free_count` equals the number of `true` flags

use crate::error::{PoolError, Result};

/// Free-list over a pool's chunks with array-based membership
///
/// Slot `i` holds the base address of chunk `i`. A scan cursor resumes the
/// free-slot search one past the last handed-out slot, so consecutive
/// allocations spread across the pool instead of always reusing the lowest
/// address.
#[derive(Debug, Default)]
pub(crate) struct FreeChunkManager {
    addrs: Vec<usize>,
    free: Vec<bool>,
    free_count: usize,
    cursor: usize,
}

impl FreeChunkManager {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Discards prior state and prepares `count` slots, all free
    pub(crate) fn reset(&mut self, count: usize) {
        self.addrs = Vec::with_capacity(count);
        self.free = vec![true; count];
        self.free_count = count;
        self.cursor = 0;
    }

    /// Appends the base address of the next chunk during pool construction
    ///
    /// Called exactly `count` times after [`reset`](Self::reset), in
    /// ascending address order.
    pub(crate) fn register_address(&mut self, addr: usize) {
        debug_assert!(self.addrs.len() < self.free.len());
        debug_assert!(self.addrs.last().is_none_or(|&prev| prev < addr));
        self.addrs.push(addr);
    }

    /// Hands out a free chunk's address and marks it occupied
    ///
    /// The search starts at the cursor and wraps once; the cursor then moves
    /// one past the returned slot. Returns `None` after a full wrap finds no
    /// free slot.
    pub(crate) fn acquire(&mut self) -> Option<usize> {
        let count = self.addrs.len();
        if count == 0 || self.free_count == 0 {
            return None;
        }
        for offset in 0..count {
            let slot = (self.cursor + offset) % count;
            if self.free[slot] {
                self.free[slot] = false;
                self.free_count -= 1;
                self.cursor = (slot + 1) % count;
                return Some(self.addrs[slot]);
            }
        }
        None
    }

    /// Marks the chunk registered at `addr` free again
    ///
    /// Membership is by exact address match. Releasing a non-member address
    /// or an already-free chunk is a caller error and leaves all state
    /// untouched.
    pub(crate) fn release(&mut self, addr: usize) -> Result<()> {
        match self.addrs.iter().position(|&registered| registered == addr) {
            Some(slot) if !self.free[slot] => {
                self.free[slot] = true;
                self.free_count += 1;
                Ok(())
            }
            Some(_) => Err(PoolError::invalid_dealloc(addr, "chunk is already free")),
            None => Err(PoolError::invalid_dealloc(
                addr,
                "address is not a chunk of this pool",
            )),
        }
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free_count
    }

    pub(crate) fn capacity(&self) -> usize {
        self.free.len()
    }
}
