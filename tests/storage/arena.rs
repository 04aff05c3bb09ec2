//! Integration tests for generational arenas
//!
//! Tests set/get through live and stale handles.

use lette_storage::GenArr;

#[test]
fn set_then_get() {
    let mut arena = GenArr::new();
    let idx = arena.alloc();

    assert!(arena.get(idx).is_none());
    assert!(arena.set(idx, "sheet"));
    assert_eq!(arena.get(idx), Some(&"sheet"));
}

#[test]
fn old_handle_reads_absent_after_reuse() {
    let mut arena = GenArr::new();
    let old = arena.insert(1);
    arena.dealloc(old);
    let new = arena.alloc();
    assert_eq!(new.index, old.index);

    arena.set(new, 2);
    assert!(arena.get(old).is_none());
    assert_eq!(arena.get(new), Some(&2));
}

#[test]
fn stale_write_is_dropped() {
    let mut arena = GenArr::new();
    let old = arena.alloc();
    arena.dealloc(old);
    let new = arena.alloc();

    assert!(!arena.set(old, "late"));
    assert!(arena.get(new).is_none());
}

#[test]
fn reused_slot_starts_empty() {
    let mut arena = GenArr::new();
    let old = arena.insert("first");
    arena.dealloc(old);
    let new = arena.alloc();

    assert!(arena.get(new).is_none());
}

#[test]
fn iteration_skips_dead_and_empty_slots() {
    let mut arena = GenArr::new();
    let a = arena.insert(1);
    let b = arena.insert(2);
    let _empty = arena.alloc();
    arena.dealloc(a);

    let items: Vec<_> = arena.iter().collect();
    assert_eq!(items, vec![(b, &2)]);
    assert_eq!(arena.len(), 2);
}

#[test]
fn take_empties_the_slot() {
    let mut arena = GenArr::new();
    let idx = arena.insert(String::from("level"));

    assert_eq!(arena.take(idx).as_deref(), Some("level"));
    assert!(arena.get(idx).is_none());
    assert!(arena.is_alive(idx));
}
