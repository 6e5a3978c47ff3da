//! Shared allocator handles and the typed element surface
//!
//! Containers hold an [`AllocHandle`], not the allocator itself. Handles are
//! cheap to clone, all clones refer to the identical pool storage, and the
//! storage is dropped exactly once, when the last handle goes away. Equality
//! is identity of the storage, which is how containers decide whether two
//! handles can exchange allocations.
//!
//! The allocators are single-threaded by design, so the sharing primitive is
//! `Rc<RefCell<_>>` rather than an atomic one.

use core::fmt;
use core::mem;
use core::ptr::NonNull;
use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{PoolError, Result};
use crate::traits::RawAllocator;

/// Lightweight, copyable reference to shared pool storage
pub struct AllocHandle<A> {
    shared: Rc<RefCell<A>>,
}

impl<A> AllocHandle<A> {
    /// Wraps an allocator in shared storage and returns the first handle
    pub fn new(allocator: A) -> Self {
        Self {
            shared: Rc::new(RefCell::new(allocator)),
        }
    }

    /// Runs a read-only query against the allocator, e.g. a stats snapshot
    pub fn with<R>(&self, query: impl FnOnce(&A) -> R) -> R {
        query(&self.shared.borrow())
    }

    /// Number of live handles to this storage
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.shared)
    }
}

impl<A: RawAllocator> AllocHandle<A> {
    /// Allocates `bytes` bytes from the shared allocator
    pub fn allocate_bytes(&self, bytes: usize) -> Result<NonNull<u8>> {
        self.shared.borrow_mut().allocate_bytes(bytes)
    }

    /// Returns `bytes` bytes previously allocated at `ptr`
    pub fn deallocate_bytes(&self, ptr: NonNull<u8>, bytes: usize) -> Result<()> {
        self.shared.borrow_mut().deallocate_bytes(ptr, bytes)
    }

    /// Allocates storage for `count` values of `T`
    ///
    /// A zero-sized request returns a dangling pointer that must not be
    /// deallocated through [`deallocate_for`](Self::deallocate_for) with a
    /// non-zero count.
    ///
    /// The pools have no notion of element alignment: a chunk address is
    /// only guaranteed to be aligned for `T` when the configured chunk size
    /// is a multiple of `align_of::<T>()`.
    pub fn allocate_for<T>(&self, count: usize) -> Result<NonNull<T>> {
        let bytes = mem::size_of::<T>()
            .checked_mul(count)
            .ok_or_else(|| PoolError::invalid_config("allocation size overflows"))?;
        if bytes == 0 {
            return Ok(NonNull::dangling());
        }
        Ok(self.allocate_bytes(bytes)?.cast())
    }

    /// Returns storage for `count` values of `T` allocated at `ptr`
    pub fn deallocate_for<T>(&self, ptr: NonNull<T>, count: usize) -> Result<()> {
        let bytes = mem::size_of::<T>()
            .checked_mul(count)
            .ok_or_else(|| PoolError::invalid_config("allocation size overflows"))?;
        if bytes == 0 {
            return Ok(());
        }
        self.deallocate_bytes(ptr.cast(), bytes)
    }

    /// Writes `value` into uninitialized storage at `ptr`
    ///
    /// The allocator has no opinion on element contents; this is a plain
    /// in-place write.
    ///
    /// # Safety
    /// `ptr` must point at valid, properly aligned storage for `T` obtained
    /// from this allocator, and must not already hold a live `T`.
    pub unsafe fn construct_at<T>(&self, ptr: NonNull<T>, value: T) {
        // SAFETY: validity and alignment are the caller's contract.
        unsafe { ptr.as_ptr().write(value) }
    }

    /// Drops the `T` at `ptr` in place, leaving the storage allocated
    ///
    /// # Safety
    /// `ptr` must point at a live, properly aligned `T` that is not dropped
    /// again afterwards.
    pub unsafe fn destroy_at<T>(&self, ptr: NonNull<T>) {
        // SAFETY: liveness and alignment are the caller's contract.
        unsafe { ptr.as_ptr().drop_in_place() }
    }
}

impl<A> Clone for AllocHandle<A> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

/// Two handles are equal iff they reference the identical pool storage
impl<A> PartialEq for AllocHandle<A> {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl<A> Eq for AllocHandle<A> {}

impl<A> fmt::Debug for AllocHandle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocHandle")
            .field("storage", &Rc::as_ptr(&self.shared))
            .field("handles", &Rc::strong_count(&self.shared))
            .finish()
    }
}
