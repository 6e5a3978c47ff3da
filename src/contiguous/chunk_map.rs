//! Per-pool chunk descriptors for the contiguous-run allocator
//!
//! ## Invariants
//!
//! - Chunk `i` starts at `base + i * chunk_size`; the layout never changes
//! - A run is only marked occupied if every chunk in it was free, and only
//!   marked free if every chunk in it was occupied

use crate::error::{PoolError, Result};

/// Map from chunk index to free flag for one pool
#[derive(Debug)]
pub(crate) struct ChunkMap {
    base: usize,
    chunk_size: usize,
    free: Vec<bool>,
}

impl ChunkMap {
    pub(crate) fn new(base: usize, chunk_size: usize, chunk_count: usize) -> Self {
        debug_assert!(chunk_size > 0 && chunk_count > 0);
        Self {
            base,
            chunk_size,
            free: vec![true; chunk_count],
        }
    }

    pub(crate) fn chunk_count(&self) -> usize {
        self.free.len()
    }

    pub(crate) fn free_count(&self) -> usize {
        self.free.iter().filter(|&&is_free| is_free).count()
    }

    /// Base address of chunk `index`
    pub(crate) fn addr_of(&self, index: usize) -> usize {
        debug_assert!(index < self.free.len());
        self.base + index * self.chunk_size
    }

    /// Whether `addr` falls inside this pool's region
    pub(crate) fn contains(&self, addr: usize) -> bool {
        addr >= self.base && addr < self.base + self.free.len() * self.chunk_size
    }

    /// Chunk index for `addr`, if it sits exactly on a chunk boundary
    pub(crate) fn index_of(&self, addr: usize) -> Option<usize> {
        if !self.contains(addr) {
            return None;
        }
        let offset = addr - self.base;
        (offset % self.chunk_size == 0).then(|| offset / self.chunk_size)
    }

    /// First-fit scan for `needed` consecutive free chunks
    ///
    /// Returns the starting index of the left-most such run.
    pub(crate) fn find_free_run(&self, needed: usize) -> Option<usize> {
        if needed == 0 || needed > self.free.len() {
            return None;
        }
        let mut run = 0;
        for (index, &is_free) in self.free.iter().enumerate() {
            if is_free {
                run += 1;
                if run == needed {
                    return Some(index + 1 - needed);
                }
            } else {
                run = 0;
            }
        }
        None
    }

    /// Marks `len` chunks starting at `start` occupied
    ///
    /// The run must have come from [`find_free_run`](Self::find_free_run).
    pub(crate) fn occupy_run(&mut self, start: usize, len: usize) {
        debug_assert!(start + len <= self.free.len());
        for flag in &mut self.free[start..start + len] {
            debug_assert!(*flag);
            *flag = false;
        }
    }

    /// Marks `len` chunks starting at `start` free again
    ///
    /// # Errors
    /// Rejects a run that overhangs the pool or contains an already-free
    /// chunk; in either case no flag is changed.
    pub(crate) fn release_run(&mut self, start: usize, len: usize) -> Result<()> {
        if start + len > self.free.len() {
            return Err(PoolError::invalid_dealloc(
                self.base + start * self.chunk_size,
                "run extends past the end of the pool",
            ));
        }
        if self.free[start..start + len].iter().any(|&is_free| is_free) {
            return Err(PoolError::invalid_dealloc(
                self.addr_of(start),
                "run contains a chunk that is already free",
            ));
        }
        for flag in &mut self.free[start..start + len] {
            *flag = true;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fit_finds_leftmost_run() {
        let mut map = ChunkMap::new(0x1000, 8, 4);
        assert_eq!(map.find_free_run(3), Some(0));
        map.occupy_run(0, 1);
        assert_eq!(map.find_free_run(3), Some(1));
        assert_eq!(map.find_free_run(4), None);
    }

    #[test]
    fn run_longer_than_pool_never_matches() {
        let map = ChunkMap::new(0x1000, 8, 4);
        assert_eq!(map.find_free_run(5), None);
        assert_eq!(map.find_free_run(0), None);
    }

    #[test]
    fn index_of_requires_chunk_boundary() {
        let map = ChunkMap::new(0x1000, 8, 4);
        assert_eq!(map.index_of(0x1000), Some(0));
        assert_eq!(map.index_of(0x1010), Some(2));
        assert_eq!(map.index_of(0x1004), None);
        assert_eq!(map.index_of(0x1020), None);
        assert_eq!(map.index_of(0x0FFF), None);
    }

    #[test]
    fn release_run_rejects_partial_frees() {
        let mut map = ChunkMap::new(0x1000, 8, 4);
        map.occupy_run(0, 2);
        // Chunk 2 is still free, so releasing chunks 1..3 must fail whole.
        assert!(map.release_run(1, 2).is_err());
        assert_eq!(map.free_count(), 2);
        map.release_run(0, 2).unwrap();
        assert_eq!(map.free_count(), 4);
    }

    #[test]
    fn release_run_rejects_overhang() {
        let mut map = ChunkMap::new(0x1000, 8, 4);
        map.occupy_run(2, 2);
        assert!(map.release_run(2, 3).is_err());
        assert_eq!(map.free_count(), 2);
    }
}
