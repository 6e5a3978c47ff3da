//! Integration tests for shared handles and the typed element surface

use std::cell::Cell;
use std::rc::Rc;

use chunk_pool::{
    AllocHandle, ContiguousConfig, ContiguousPoolAllocator, PoolRegistry, SizedConfig,
};

/// Element type that records how many times it was dropped
struct DropProbe {
    drops: Rc<Cell<usize>>,
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn sized_handle() -> AllocHandle<PoolRegistry> {
    let config = SizedConfig::new().with_pool(8, 16).with_pool(4, 64);
    AllocHandle::new(PoolRegistry::new(&config).expect("failed to build registry"))
}

#[test]
fn clones_compare_equal_and_share_allocations() {
    let original = sized_handle();
    let copy = original.clone();
    assert_eq!(original, copy);

    let ptr = original.allocate_bytes(16).unwrap();
    assert_eq!(copy.with(|r| r.outstanding_allocations()), 1);
    copy.deallocate_bytes(ptr, 16).unwrap();
    assert_eq!(original.with(|r| r.outstanding_allocations()), 0);
}

#[test]
fn independent_storages_compare_unequal() {
    assert_ne!(sized_handle(), sized_handle());
}

#[test]
fn storage_outlives_the_original_handle() {
    let copy;
    let ptr;
    {
        let original = sized_handle();
        copy = original.clone();
        ptr = original.allocate_bytes(16).unwrap();
        assert_eq!(original.handle_count(), 2);
    }
    // The original handle is gone; the surviving clone still owns the pools
    // and the outstanding allocation is still valid.
    assert_eq!(copy.handle_count(), 1);
    copy.deallocate_bytes(ptr, 16).unwrap();
}

#[test]
fn element_lifecycle_runs_through_construct_and_destroy() {
    let handle = sized_handle();
    let drops = Rc::new(Cell::new(0));

    let ptr = handle.allocate_for::<DropProbe>(1).unwrap();
    unsafe {
        handle.construct_at(
            ptr,
            DropProbe {
                drops: Rc::clone(&drops),
            },
        );
    }
    assert_eq!(drops.get(), 0);

    unsafe { handle.destroy_at(ptr) };
    assert_eq!(drops.get(), 1, "destroy_at must drop the element exactly once");

    // The storage is still allocated after destroy; return it separately.
    handle.deallocate_for(ptr, 1).unwrap();
    assert_eq!(drops.get(), 1);
}

#[test]
fn typed_allocation_spans_multiple_elements() {
    let handle = sized_handle();

    // Five u64 values need 40 bytes and route to the 64-byte pool.
    let ptr = handle.allocate_for::<u64>(5).unwrap();
    for i in 0..5 {
        unsafe {
            handle.construct_at(ptr.add(i), i as u64 * 3);
        }
    }
    for i in 0..5 {
        assert_eq!(unsafe { ptr.add(i).read() }, i as u64 * 3);
    }
    handle.deallocate_for(ptr, 5).unwrap();
}

#[test]
fn contiguous_allocator_shares_through_the_same_handle_type() {
    let alloc = ContiguousPoolAllocator::new(ContiguousConfig::new(64, 8, 1)).unwrap();
    let handle = AllocHandle::new(alloc);
    let copy = handle.clone();

    // Three u64s span three chunks; the clone releases them.
    let ptr = handle.allocate_for::<u64>(3).unwrap();
    copy.deallocate_for(ptr, 3).unwrap();
    assert_eq!(handle.with(|a| a.free_chunks(0)), Some(8));
}
