//! Integration tests for the contiguous-run allocator

use std::ptr::NonNull;

use chunk_pool::{ContiguousConfig, ContiguousPoolAllocator, MemoryUsage};

/// One pool of four 8-byte chunks, the layout used throughout these tests
fn four_chunk_pool() -> ContiguousPoolAllocator {
    ContiguousPoolAllocator::new(ContiguousConfig::new(32, 8, 1)).expect("failed to build allocator")
}

#[test]
fn twenty_bytes_take_three_chunks_from_the_front() {
    let mut alloc = four_chunk_pool();
    let base = alloc.allocate(8).unwrap();
    alloc.release(base, 8).unwrap();

    // All four chunks free: the run starts at chunk 0.
    let run = alloc.allocate(20).unwrap();
    assert_eq!(run, base);
    assert_eq!(alloc.free_chunks(0), Some(1));
    alloc.release(run, 20).unwrap();
}

#[test]
fn run_skips_an_occupied_leading_chunk() {
    let mut alloc = four_chunk_pool();
    let head = alloc.allocate(8).unwrap();

    // Chunks 1..3 are free, so the run lands one chunk past the head.
    let run = alloc.allocate(20).unwrap();
    assert_eq!(run.as_ptr() as usize, head.as_ptr() as usize + 8);

    alloc.release(run, 20).unwrap();
    alloc.release(head, 8).unwrap();
}

#[test]
fn fragmented_free_chunks_cannot_serve_a_run() {
    let mut alloc = four_chunk_pool();
    let chunks: Vec<NonNull<u8>> = (0..4).map(|_| alloc.allocate(8).unwrap()).collect();

    // Free chunks 1 and 3: two free chunks, but never adjacent.
    alloc.release(chunks[1], 8).unwrap();
    alloc.release(chunks[3], 8).unwrap();
    assert_eq!(alloc.free_chunks(0), Some(2));

    let err = alloc.allocate(16).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(alloc.free_chunks(0), Some(2));

    alloc.release(chunks[0], 8).unwrap();
    alloc.release(chunks[2], 8).unwrap();
}

#[test]
fn request_larger_than_a_pool_fails_without_mutation() {
    let mut alloc = four_chunk_pool();
    let err = alloc.allocate(33).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(alloc.available_bytes(), 32);
    assert_eq!(alloc.used_bytes(), 0);
}

#[test]
fn request_beyond_remaining_capacity_fails_early() {
    let mut alloc = four_chunk_pool();
    let held = alloc.allocate(24).unwrap();
    assert_eq!(alloc.available_bytes(), 8);

    let err = alloc.allocate(16).unwrap_err();
    assert!(err.is_out_of_memory());
    assert_eq!(alloc.available_bytes(), 8);

    alloc.release(held, 24).unwrap();
}

#[test]
fn release_recomputes_the_run_from_the_byte_count() {
    // Element size deliberately not a multiple of the chunk size: the
    // release path must rely on address arithmetic, not element strides.
    let mut alloc = four_chunk_pool();
    let run = alloc.allocate(20).unwrap();
    alloc.release(run, 20).unwrap();
    assert_eq!(alloc.free_chunks(0), Some(4));
    assert_eq!(alloc.available_bytes(), 32);
}

#[test]
fn double_release_is_rejected_whole() {
    let mut alloc = four_chunk_pool();
    let run = alloc.allocate(16).unwrap();
    alloc.release(run, 16).unwrap();

    let err = alloc.release(run, 16).unwrap_err();
    assert!(err.is_invalid_deallocation());
    assert_eq!(alloc.available_bytes(), 32);
}

#[test]
fn partially_free_run_is_not_released() {
    let mut alloc = four_chunk_pool();
    let a = alloc.allocate(8).unwrap();
    let b = alloc.allocate(8).unwrap();
    alloc.release(b, 8).unwrap();

    // Releasing two chunks starting at `a` would cover the already-free
    // chunk behind it; the whole release must fail and free nothing.
    let err = alloc.release(a, 16).unwrap_err();
    assert!(err.is_invalid_deallocation());
    assert_eq!(alloc.free_chunks(0), Some(3));

    alloc.release(a, 8).unwrap();
}

#[test]
fn foreign_and_misaligned_addresses_are_rejected() {
    let mut alloc = four_chunk_pool();
    let run = alloc.allocate(8).unwrap();

    let mut local = 0u64;
    let foreign = NonNull::from(&mut local).cast::<u8>();
    assert!(alloc.release(foreign, 8).unwrap_err().is_invalid_deallocation());

    // An interior pointer is inside the pool but off the chunk grid.
    let interior = NonNull::new(unsafe { run.as_ptr().add(3) }).unwrap();
    assert!(alloc.release(interior, 8).unwrap_err().is_invalid_deallocation());

    alloc.release(run, 8).unwrap();
}

#[test]
fn full_pool_spills_into_the_next_pool() {
    let mut alloc = ContiguousPoolAllocator::new(ContiguousConfig::new(16, 8, 2)).unwrap();
    let first = alloc.allocate(16).unwrap();
    let second = alloc.allocate(16).unwrap();

    assert_ne!(first, second);
    assert_eq!(alloc.remaining_bytes(0), Some(0));
    assert_eq!(alloc.remaining_bytes(1), Some(0));
    assert!(alloc.allocate(8).unwrap_err().is_out_of_memory());

    alloc.release(first, 16).unwrap();
    alloc.release(second, 16).unwrap();
    assert_eq!(alloc.available_bytes(), 32);
}

#[test]
fn misaligned_configuration_is_rejected_at_construction() {
    let err = ContiguousPoolAllocator::new(ContiguousConfig::new(100, 8, 1)).unwrap_err();
    assert!(matches!(err, chunk_pool::PoolError::InvalidConfig { .. }));
}

#[test]
fn default_configuration_builds_one_large_pool() {
    let alloc = ContiguousPoolAllocator::with_default_config().unwrap();
    assert_eq!(alloc.pool_count(), 1);
    assert_eq!(alloc.total_bytes(), 16384);
    assert_eq!(alloc.config().chunk_size, 128);
}
