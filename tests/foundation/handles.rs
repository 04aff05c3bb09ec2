//! Integration tests for generational handles
//!
//! Tests null handles, equality, and formatting.

use lette_foundation::GenIdx;

#[test]
fn default_is_null() {
    assert!(GenIdx::default().is_null());
    assert_eq!(GenIdx::default(), GenIdx::NULL);
}

#[test]
fn generation_zero_is_null() {
    assert!(GenIdx::new(7, 0).is_null());
    assert!(!GenIdx::new(0, 1).is_null());
}

#[test]
fn handles_differ_by_generation() {
    assert_ne!(GenIdx::new(1, 1), GenIdx::new(1, 2));
    assert_eq!(GenIdx::new(1, 1).slot(), GenIdx::new(1, 2).slot());
}

#[test]
fn formatting() {
    assert_eq!(format!("{:?}", GenIdx::new(3, 7)), "GenIdx(3v7)");
    assert_eq!(format!("{:?}", GenIdx::NULL), "GenIdx(null)");
    assert_eq!(GenIdx::new(3, 7).to_string(), "#3");
}
