//! Integration tests for generational allocation
//!
//! Tests slot reuse, generation bumps, and stale handle detection.

use lette_foundation::GenIdx;
use lette_storage::GenIdxAllocator;

// =============================================================================
// Allocation
// =============================================================================

#[test]
fn alloc_yields_distinct_live_handles() {
    let mut allocator = GenIdxAllocator::new();
    let a = allocator.alloc();
    let b = allocator.alloc();

    assert_ne!(a, b);
    assert!(allocator.is_alive(a));
    assert!(allocator.is_alive(b));
    assert_eq!(allocator.live_count(), 2);
}

#[test]
fn null_handle_is_never_alive() {
    let mut allocator = GenIdxAllocator::new();
    allocator.alloc();
    assert!(!allocator.is_alive(GenIdx::NULL));
}

// =============================================================================
// Reuse
// =============================================================================

#[test]
fn realloc_bumps_generation() {
    let mut allocator = GenIdxAllocator::new();
    let old = allocator.alloc();
    assert!(allocator.dealloc(old));

    let new = allocator.alloc();
    assert_eq!(new.index, old.index);
    assert!(new.generation > old.generation);
    assert!(!allocator.is_alive(old));
    assert!(allocator.is_alive(new));
}

#[test]
fn free_list_is_lifo() {
    let mut allocator = GenIdxAllocator::new();
    let a = allocator.alloc();
    let b = allocator.alloc();
    allocator.dealloc(a);
    allocator.dealloc(b);

    assert_eq!(allocator.alloc().index, b.index);
    assert_eq!(allocator.alloc().index, a.index);
    assert_eq!(allocator.len(), 2);
}

#[test]
fn double_dealloc_fails() {
    let mut allocator = GenIdxAllocator::new();
    let a = allocator.alloc();

    assert!(allocator.dealloc(a));
    assert!(!allocator.dealloc(a));
    assert_eq!(allocator.live_count(), 0);
}

#[test]
fn stale_dealloc_does_not_free_new_occupant() {
    let mut allocator = GenIdxAllocator::new();
    let old = allocator.alloc();
    allocator.dealloc(old);
    let new = allocator.alloc();

    assert!(!allocator.dealloc(old));
    assert!(allocator.is_alive(new));
}

#[test]
fn iter_lists_live_handles() {
    let mut allocator = GenIdxAllocator::new();
    let a = allocator.alloc();
    let b = allocator.alloc();
    let c = allocator.alloc();
    allocator.dealloc(b);

    assert_eq!(allocator.iter().collect::<Vec<_>>(), vec![a, c]);
}
